//! Today timeline domain: the browser side of the scroll-to-time engine.

pub mod browser_clock;
pub mod dom_listener;
pub mod timeline_actor;

pub use browser_clock::BrowserClock;
pub use timeline_actor::TodayTimeline;
