use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Raw DOM event listener that unregisters itself when dropped.
pub struct DomListener {
    target: web_sys::EventTarget,
    event_names: &'static [&'static str],
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl DomListener {
    pub fn new(
        target: &web_sys::EventTarget,
        event_names: &'static [&'static str],
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        for event_name in event_names {
            if let Err(error) =
                target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
            {
                zoon::eprintln!("Failed to listen for `{event_name}`: {error:?}");
            }
        }
        Self {
            target: target.clone(),
            event_names,
            closure,
        }
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        for event_name in self.event_names {
            if let Err(error) = self
                .target
                .remove_event_listener_with_callback(event_name, self.closure.as_ref().unchecked_ref())
            {
                zoon::eprintln!("Failed to stop listening for `{event_name}`: {error:?}");
            }
        }
    }
}
