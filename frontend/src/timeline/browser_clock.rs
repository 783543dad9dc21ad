use shared::{CalendarDate, Clock, WallTime};

/// Local wall-clock time from `Date`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl BrowserClock {
    pub fn today(&self) -> CalendarDate {
        let date = js_sys::Date::new_0();
        CalendarDate {
            weekday: date.get_day() as u8,
            month: date.get_month() as u8,
            day: date.get_date() as u8,
        }
    }
}

impl Clock for BrowserClock {
    fn now(&self) -> WallTime {
        let date = js_sys::Date::new_0();
        WallTime {
            hour: date.get_hours() as u8,
            minute: date.get_minutes() as u8,
            second: date.get_seconds() as u8,
            millisecond: date.get_milliseconds() as u16,
        }
    }
}
