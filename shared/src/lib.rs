//! Scroll-to-time synchronization engine for the Today timeline.
//!
//! Everything here is platform independent: the browser front end feeds
//! measurements and input into a [`TimelineController`] and executes the
//! [`Command`]s it returns.

pub mod clock;
pub mod config;
pub mod controller;
pub mod events;
pub mod mapping;
pub mod scale;
pub mod time_of_day;

pub use clock::{Clock, ManualClock};
pub use config::{ConfigError, TimelineConfig};
pub use controller::{
    Command, Input, InteractionState, ScrollBehavior, TimelineController, TimelineStatus, TimerKind,
};
pub use events::{
    EventDay, EventGeometry, EventsError, ScheduledEvent, load_events_from_toml, split_by_day,
    tomorrow_summary_top,
};
pub use scale::TimelineScale;
pub use time_of_day::{CalendarDate, TimeOfDay, WallTime, hour_label};
