//! Day-relative time values.
//!
//! The timeline only ever shows hours and minutes of the current calendar
//! day, so `TimeOfDay` carries nothing else. `WallTime` is what a clock
//! reports and keeps the seconds and milliseconds needed to align timers to
//! minute boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HOURS_PER_DAY: usize = 24;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const MS_PER_SECOND: u32 = 1_000;
pub const MS_PER_MINUTE: u32 = 60_000;
pub const MS_PER_DAY: u64 = 24 * 60 * 60 * 1_000;

/// Hour and minute of the current day, always within 00:00..=23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };
    pub const LAST_MINUTE: TimeOfDay = TimeOfDay { hour: 23, minute: 59 };

    /// Returns `None` when either component is out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (usize::from(hour) < HOURS_PER_DAY && u32::from(minute) < MINUTES_PER_HOUR)
            .then_some(TimeOfDay { hour, minute })
    }

    /// Minutes past midnight, saturating at 23:59.
    pub fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes.min(MINUTES_PER_DAY - 1);
        TimeOfDay {
            hour: (minutes / MINUTES_PER_HOUR) as u8,
            minute: (minutes % MINUTES_PER_HOUR) as u8,
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hour) * MINUTES_PER_HOUR + u32::from(self.minute)
    }

    pub fn is_am(self) -> bool {
        self.hour < 12
    }

    /// "9:30" and "AM", the two halves the indicator renders separately.
    pub fn clock_parts(self) -> (String, &'static str) {
        let period = if self.is_am() { "AM" } else { "PM" };
        (format!("{}:{:02}", twelve_hour(self.hour), self.minute), period)
    }

    pub fn to_12_hour_string(self) -> String {
        let (time, period) = self.clock_parts();
        format!("{time} {period}")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time of day `{0}`, expected HH:MM between 00:00 and 23:59")]
pub struct ParseTimeOfDayError(String);

impl FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeOfDayError(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(err)?;
        let hour = hour.parse::<u8>().map_err(|_| err())?;
        let minute = minute.parse::<u8>().map_err(|_| err())?;
        TimeOfDay::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseTimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Label printed next to an hour block: "12 AM", "1 PM" or "13:00".
pub fn hour_label(hour: u8, use_24_hour: bool) -> String {
    if use_24_hour {
        format!("{hour:02}:00")
    } else {
        let period = if hour < 12 { "AM" } else { "PM" };
        format!("{} {period}", twelve_hour(hour))
    }
}

fn twelve_hour(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// A clock reading with sub-minute precision, local to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl WallTime {
    /// Milliseconds since local midnight; values past one day wrap around.
    pub fn from_millis_since_midnight(millis: u64) -> Self {
        let millis = millis % MS_PER_DAY;
        let total_seconds = millis / u64::from(MS_PER_SECOND);
        WallTime {
            hour: (total_seconds / 3_600) as u8,
            minute: ((total_seconds / 60) % 60) as u8,
            second: (total_seconds % 60) as u8,
            millisecond: (millis % u64::from(MS_PER_SECOND)) as u16,
        }
    }

    pub fn millis_since_midnight(self) -> u64 {
        ((u64::from(self.hour) * 60 + u64::from(self.minute)) * 60 + u64::from(self.second))
            * u64::from(MS_PER_SECOND)
            + u64::from(self.millisecond)
    }

    pub fn time_of_day(self) -> TimeOfDay {
        TimeOfDay::new(self.hour.min(23), self.minute.min(59)).unwrap_or(TimeOfDay::LAST_MINUTE)
    }

    /// Delay until the next minute boundary: `(60 - s) * 1000 - ms`.
    ///
    /// Always within 1..=60000; a reading exactly on a boundary waits a
    /// whole minute.
    pub fn ms_until_next_minute(self) -> u32 {
        let elapsed = u32::from(self.second.min(59)) * MS_PER_SECOND
            + u32::from(self.millisecond.min(999));
        MS_PER_MINUTE - elapsed
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Local calendar date shown in the header, e.g. "Tue, Oct 16".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    /// 0 is Sunday.
    pub weekday: u8,
    /// 0 is January.
    pub month: u8,
    pub day: u8,
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weekday = WEEKDAY_NAMES[usize::from(self.weekday) % WEEKDAY_NAMES.len()];
        let month = MONTH_NAMES[usize::from(self.month) % MONTH_NAMES.len()];
        write!(f, "{weekday}, {month} {}", self.day)
    }
}
