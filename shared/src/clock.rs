use crate::time_of_day::WallTime;
use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" for the timeline engine.
///
/// The browser front end reads `js_sys::Date`; tests drive a `ManualClock`.
pub trait Clock {
    fn now(&self) -> WallTime;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> WallTime {
        (**self).now()
    }
}

/// Clock whose time only moves when told to. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis_since_midnight: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn at(hour: u8, minute: u8, second: u8, millisecond: u16) -> Self {
        let reading = WallTime { hour, minute, second, millisecond };
        Self {
            millis_since_midnight: Rc::new(Cell::new(reading.millis_since_midnight())),
        }
    }

    pub fn set(&self, reading: WallTime) {
        self.millis_since_midnight.set(reading.millis_since_midnight());
    }

    pub fn advance_ms(&self, millis: u64) {
        self.millis_since_midnight
            .set(self.millis_since_midnight.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> WallTime {
        WallTime::from_millis_since_midnight(self.millis_since_midnight.get())
    }
}
