//! TodayApp: configuration, agenda and the timeline domain in one place.

use crate::config::{load_sample_events, load_timeline_config};
use crate::timeline::TodayTimeline;
use shared::ScheduledEvent;
use zoon::*;

pub struct TodayApp {
    pub timeline: TodayTimeline,
    pub events: Vec<ScheduledEvent>,
}

impl TodayApp {
    pub fn new() -> Self {
        let config = load_timeline_config();
        let events = load_sample_events();
        zoon::println!(
            "Today timeline: {} events, settle after {} ms",
            events.len(),
            config.settle_delay_unlocked_ms
        );

        Self {
            timeline: TodayTimeline::new(config),
            events,
        }
    }

    pub fn root(&self) -> impl Element {
        crate::views::today_screen(&self.timeline, &self.events)
    }
}
