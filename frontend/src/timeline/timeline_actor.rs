use crate::dataflow::{Actor, Relay, relay};
use crate::timeline::browser_clock::BrowserClock;
use crate::timeline::dom_listener::DomListener;
use futures::{StreamExt, select};
use gloo_timers::callback::{Interval, Timeout};
use shared::time_of_day::HOURS_PER_DAY;
use shared::{
    Command, Input, ScrollBehavior, TimelineConfig, TimelineController, TimelineScale,
    TimelineStatus, TimerKind,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use zoon::*;

/// Coalesces the per-block resize reports of one layout pass into one measurement.
const MEASURE_DEBOUNCE_MS: u32 = 16;

type TimeoutSlot = Rc<RefCell<Option<Timeout>>>;

/// Owns the timeline controller and executes its commands in the browser.
///
/// View events arrive through the relays, are turned into controller inputs
/// and the resulting commands are carried out here: scroll commands on the
/// attached scroll container, timers as `gloo_timers` handles held one per
/// kind. After every input the status and scale actors are republished.
#[derive(Clone)]
pub struct TodayTimeline {
    controller: Rc<RefCell<TimelineController<BrowserClock>>>,
    config: TimelineConfig,
    status: Actor<TimelineStatus>,
    scale: Actor<TimelineScale>,

    scroll_container: Rc<RefCell<Option<web_sys::HtmlElement>>>,
    viewport_height: Rc<Cell<f64>>,
    hour_heights: Rc<RefCell<[f64; HOURS_PER_DAY]>>,
    measure_debounce: TimeoutSlot,
    settle_timer: TimeoutSlot,
    clock_align_timer: TimeoutSlot,
    clock_interval: Rc<RefCell<Option<Interval>>>,
    interaction_listeners: Rc<RefCell<Vec<DomListener>>>,
    visibility_listener: Rc<RefCell<Option<DomListener>>>,

    pub timeline_scrolled_relay: Relay<f64>,
    pub timeline_pointer_pressed_relay: Relay<()>,
    pub timeline_pointer_released_relay: Relay<()>,
    pub timeline_wheel_turned_relay: Relay<()>,
    pub lock_button_pressed_relay: Relay<()>,
    pub viewport_resized_relay: Relay<f64>,
    pub hour_block_resized_relay: Relay<(u8, f64)>,
    pub page_visibility_changed_relay: Relay<bool>,
}

impl TodayTimeline {
    pub fn new(config: TimelineConfig) -> Self {
        let controller = TimelineController::new(config.clone(), BrowserClock);
        let status = Actor::new(controller.status(), |_state| async move {});
        let scale = Actor::new(controller.scale().clone(), |_state| async move {});

        let (timeline_scrolled_relay, scrolled_stream) = relay::<f64>();
        let (timeline_pointer_pressed_relay, pointer_pressed_stream) = relay::<()>();
        let (timeline_pointer_released_relay, pointer_released_stream) = relay::<()>();
        let (timeline_wheel_turned_relay, wheel_turned_stream) = relay::<()>();
        let (lock_button_pressed_relay, lock_button_pressed_stream) = relay::<()>();
        let (viewport_resized_relay, viewport_resized_stream) = relay::<f64>();
        let (hour_block_resized_relay, hour_block_resized_stream) = relay::<(u8, f64)>();
        let (page_visibility_changed_relay, page_visibility_stream) = relay::<bool>();

        let timeline = Self {
            controller: Rc::new(RefCell::new(controller)),
            config,
            status,
            scale,
            scroll_container: Rc::new(RefCell::new(None)),
            viewport_height: Rc::new(Cell::new(0.0)),
            hour_heights: Rc::new(RefCell::new([0.0; HOURS_PER_DAY])),
            measure_debounce: Rc::new(RefCell::new(None)),
            settle_timer: Rc::new(RefCell::new(None)),
            clock_align_timer: Rc::new(RefCell::new(None)),
            clock_interval: Rc::new(RefCell::new(None)),
            interaction_listeners: Rc::new(RefCell::new(Vec::new())),
            visibility_listener: Rc::new(RefCell::new(None)),
            timeline_scrolled_relay,
            timeline_pointer_pressed_relay,
            timeline_pointer_released_relay,
            timeline_wheel_turned_relay,
            lock_button_pressed_relay,
            viewport_resized_relay,
            hour_block_resized_relay,
            page_visibility_changed_relay,
        };

        timeline.spawn_interaction_handlers(
            scrolled_stream,
            pointer_pressed_stream,
            pointer_released_stream,
            wheel_turned_stream,
        );
        timeline.spawn_lock_handler(lock_button_pressed_stream);
        timeline.spawn_layout_handlers(viewport_resized_stream, hour_block_resized_stream);
        timeline.spawn_visibility_handler(page_visibility_stream);
        timeline.install_visibility_listener();

        timeline
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn status_actor(&self) -> Actor<TimelineStatus> {
        self.status.clone()
    }

    pub fn scale_actor(&self) -> Actor<TimelineScale> {
        self.scale.clone()
    }

    /// Bind the scroll container, listen to it and start following the clock.
    pub fn attach_scroll_container(&self, container: web_sys::HtmlElement) {
        self.install_interaction_listeners(&container);
        *self.scroll_container.borrow_mut() = Some(container);
        let commands = self.controller.borrow_mut().start();
        self.execute(commands);
    }

    /// Stop the controller; every pending timer and DOM listener is dropped.
    pub fn detach_scroll_container(&self) {
        self.interaction_listeners.borrow_mut().clear();
        let commands = self.controller.borrow_mut().stop();
        self.execute(commands);
        if let Some(mut timer) = self.measure_debounce.borrow_mut().take() {
            timer.cancel();
        }
        *self.scroll_container.borrow_mut() = None;
    }

    fn dispatch(&self, input: Input) {
        let commands = self.controller.borrow_mut().handle(input);
        self.execute(commands);
    }

    fn execute(&self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ScrollTo { offset, behavior } => self.scroll_to(offset, behavior),
                Command::StartTimer { timer, delay_ms } => self.start_timer(timer, delay_ms),
                Command::CancelTimer(timer) => self.cancel_timer(timer),
            }
        }
        self.publish();
    }

    fn publish(&self) {
        let controller = self.controller.borrow();
        self.status.state.set_neq(controller.status());
        if *self.scale.state.lock_ref() != *controller.scale() {
            self.scale.state.set(controller.scale().clone());
        }
    }

    fn scroll_to(&self, offset: f64, behavior: ScrollBehavior) {
        let Some(container) = self.scroll_container.borrow().clone() else {
            return;
        };
        let options = web_sys::ScrollToOptions::new();
        options.set_top(offset);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        container.scroll_to_with_scroll_to_options(&options);
    }

    fn timeout_slot(&self, timer: TimerKind) -> Option<&TimeoutSlot> {
        match timer {
            TimerKind::Settle => Some(&self.settle_timer),
            TimerKind::ClockAlign => Some(&self.clock_align_timer),
            TimerKind::ClockInterval => None,
        }
    }

    fn start_timer(&self, timer: TimerKind, delay_ms: u32) {
        let timeline = self.clone();
        match self.timeout_slot(timer) {
            Some(slot) => {
                let fired_slot = slot.clone();
                let timeout = Timeout::new(delay_ms, move || {
                    *fired_slot.borrow_mut() = None;
                    timeline.dispatch(Input::TimerFired(timer));
                });
                if let Some(mut previous) = slot.borrow_mut().replace(timeout) {
                    previous.cancel();
                }
            }
            None => {
                let interval = Interval::new(delay_ms, move || {
                    timeline.dispatch(Input::TimerFired(timer));
                });
                if let Some(previous) = self.clock_interval.borrow_mut().replace(interval) {
                    previous.cancel();
                }
            }
        }
    }

    fn cancel_timer(&self, timer: TimerKind) {
        match self.timeout_slot(timer) {
            Some(slot) => {
                if let Some(mut previous) = slot.borrow_mut().take() {
                    previous.cancel();
                }
            }
            None => {
                if let Some(previous) = self.clock_interval.borrow_mut().take() {
                    previous.cancel();
                }
            }
        }
    }

    fn schedule_measure(&self) {
        if let Some(mut timer) = self.measure_debounce.borrow_mut().take() {
            timer.cancel();
        }

        let debounce_slot = self.measure_debounce.clone();
        let timeline = self.clone();
        let timeout = Timeout::new(MEASURE_DEBOUNCE_MS, move || {
            *debounce_slot.borrow_mut() = None;
            let hour_heights = timeline.hour_heights.borrow().to_vec();
            let viewport_height = timeline.viewport_height.get();
            timeline.dispatch(Input::Measured { viewport_height, hour_heights });
        });
        *self.measure_debounce.borrow_mut() = Some(timeout);
    }

    fn spawn_interaction_handlers(
        &self,
        scrolled_stream: impl futures::Stream<Item = f64> + Unpin + 'static,
        pointer_pressed_stream: impl futures::Stream<Item = ()> + Unpin + 'static,
        pointer_released_stream: impl futures::Stream<Item = ()> + Unpin + 'static,
        wheel_turned_stream: impl futures::Stream<Item = ()> + Unpin + 'static,
    ) {
        let timeline = self.clone();
        Task::start(async move {
            let mut scrolled = scrolled_stream.fuse();
            let mut pressed = pointer_pressed_stream.fuse();
            let mut released = pointer_released_stream.fuse();
            let mut wheel = wheel_turned_stream.fuse();

            loop {
                select! {
                    event = scrolled.next() => {
                        match event {
                            Some(offset) => timeline.dispatch(Input::Scrolled { offset }),
                            None => break,
                        }
                    }
                    event = pressed.next() => {
                        match event {
                            Some(()) => timeline.dispatch(Input::PointerDown),
                            None => break,
                        }
                    }
                    event = released.next() => {
                        match event {
                            Some(()) => timeline.dispatch(Input::PointerUp),
                            None => break,
                        }
                    }
                    event = wheel.next() => {
                        match event {
                            Some(()) => timeline.dispatch(Input::Wheel),
                            None => break,
                        }
                    }
                }
            }
        });
    }

    fn spawn_lock_handler(
        &self,
        lock_button_pressed_stream: impl futures::Stream<Item = ()> + Unpin + 'static,
    ) {
        let timeline = self.clone();
        Task::start(async move {
            let mut pressed = lock_button_pressed_stream.fuse();
            while let Some(()) = pressed.next().await {
                let locked = !timeline.controller.borrow().is_locked();
                timeline.dispatch(Input::LockChanged(locked));
            }
        });
    }

    fn spawn_layout_handlers(
        &self,
        viewport_resized_stream: impl futures::Stream<Item = f64> + Unpin + 'static,
        hour_block_resized_stream: impl futures::Stream<Item = (u8, f64)> + Unpin + 'static,
    ) {
        let timeline = self.clone();
        Task::start(async move {
            let mut viewport = viewport_resized_stream.fuse();
            let mut hour_blocks = hour_block_resized_stream.fuse();

            loop {
                select! {
                    event = viewport.next() => {
                        match event {
                            Some(height) => {
                                timeline.viewport_height.set(height);
                                timeline.schedule_measure();
                            }
                            None => break,
                        }
                    }
                    event = hour_blocks.next() => {
                        match event {
                            Some((hour, height)) => {
                                if let Some(slot) = timeline.hour_heights.borrow_mut().get_mut(usize::from(hour)) {
                                    *slot = height;
                                }
                                timeline.schedule_measure();
                            }
                            None => break,
                        }
                    }
                }
            }
        });
    }

    fn spawn_visibility_handler(
        &self,
        page_visibility_stream: impl futures::Stream<Item = bool> + Unpin + 'static,
    ) {
        let timeline = self.clone();
        Task::start(async move {
            let mut visibility = page_visibility_stream.fuse();
            while let Some(visible) = visibility.next().await {
                timeline.dispatch(Input::VisibilityChanged { visible });
            }
        });
    }

    /// Scroll, press and wheel on the container; releases on the window so a
    /// drag that ends outside the timeline still counts.
    fn install_interaction_listeners(&self, container: &web_sys::HtmlElement) {
        let mut listeners = self.interaction_listeners.borrow_mut();
        listeners.clear();

        let timeline_scrolled_relay = self.timeline_scrolled_relay.clone();
        listeners.push(DomListener::new(container, &["scroll"], move |event| {
            if let Some(element) = event
                .current_target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            {
                timeline_scrolled_relay.send(f64::from(element.scroll_top()));
            }
        }));

        let timeline_pointer_pressed_relay = self.timeline_pointer_pressed_relay.clone();
        listeners.push(DomListener::new(container, &["mousedown", "touchstart"], move |_| {
            timeline_pointer_pressed_relay.send(())
        }));

        let timeline_wheel_turned_relay = self.timeline_wheel_turned_relay.clone();
        listeners.push(DomListener::new(container, &["wheel"], move |_| {
            timeline_wheel_turned_relay.send(())
        }));

        let Some(window) = web_sys::window() else {
            zoon::eprintln!("No window available, pointer releases are not tracked");
            return;
        };
        let timeline_pointer_released_relay = self.timeline_pointer_released_relay.clone();
        listeners.push(DomListener::new(
            &window,
            &["mouseup", "touchend", "touchcancel"],
            move |_| timeline_pointer_released_relay.send(()),
        ));
    }

    fn install_visibility_listener(&self) {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            zoon::eprintln!("No document available, page visibility is not tracked");
            return;
        };

        let page_visibility_changed_relay = self.page_visibility_changed_relay.clone();
        let listener = DomListener::new(&document, &["visibilitychange"], move |event| {
            let hidden = event
                .current_target()
                .and_then(|target| target.dyn_into::<web_sys::Document>().ok())
                .is_some_and(|document| document.hidden());
            page_visibility_changed_relay.send(!hidden);
        });
        *self.visibility_listener.borrow_mut() = Some(listener);
    }
}
