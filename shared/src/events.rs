use crate::scale::TimelineScale;
use crate::time_of_day::{MINUTES_PER_DAY, TimeOfDay};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_EVENT_COLOR: &str = "#6750a4";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventDay {
    #[default]
    Today,
    Tomorrow,
}

/// One entry of the agenda shown alongside the timeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub day: EventDay,
    pub start: TimeOfDay,
    #[serde(default)]
    pub end: Option<TimeOfDay>,
}

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Position of an event over the hour blocks, in padded content pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventGeometry {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("failed to parse events: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("event `{id}` ends at {end} before it starts at {start}")]
    EndBeforeStart { id: String, start: TimeOfDay, end: TimeOfDay },
    #[error("event id `{0}` is used more than once")]
    DuplicateId(String),
}

#[derive(Deserialize)]
struct EventsFile {
    #[serde(default)]
    events: Vec<ScheduledEvent>,
}

/// Parse an `[[events]]` document, sorted by day and start time.
pub fn load_events_from_toml(source: &str) -> Result<Vec<ScheduledEvent>, EventsError> {
    let EventsFile { mut events } = toml::from_str(source)?;

    let mut seen_ids = HashSet::new();
    for event in &events {
        if !seen_ids.insert(event.id.as_str()) {
            return Err(EventsError::DuplicateId(event.id.clone()));
        }
        if let Some(end) = event.end {
            if end < event.start {
                return Err(EventsError::EndBeforeStart {
                    id: event.id.clone(),
                    start: event.start,
                    end,
                });
            }
        }
    }

    events.sort_by_key(|event| (event.day, event.start));
    Ok(events)
}

impl ScheduledEvent {
    /// "10:00 AM - 11:00 AM", or just the start when there is no end.
    pub fn time_range_label(&self) -> String {
        match self.end {
            Some(end) => format!("{} - {}", self.start.to_12_hour_string(), end.to_12_hour_string()),
            None => self.start.to_12_hour_string(),
        }
    }

    pub fn is_today(&self) -> bool {
        self.day == EventDay::Today
    }

    /// Block covered by the event on `scale`.
    ///
    /// Events without an end span `default_minutes`, cut off at the end of
    /// the day.
    pub fn geometry(&self, scale: &TimelineScale, default_minutes: u32) -> EventGeometry {
        let start = scale.time_to_content_offset(self.start);
        let end = match self.end {
            Some(end) => scale.time_to_content_offset(end),
            None => {
                let end_minutes = self.start.minutes_since_midnight() + default_minutes;
                if end_minutes >= MINUTES_PER_DAY {
                    scale.height_before_hour(24)
                } else {
                    scale.time_to_content_offset(TimeOfDay::from_minutes(end_minutes))
                }
            }
        };
        EventGeometry {
            top: scale.padding_top() + start,
            height: (end - start).max(0.0),
        }
    }
}

/// Where the tomorrow summary sits: right after the last hour block.
pub fn tomorrow_summary_top(scale: &TimelineScale) -> f64 {
    scale.padding_top() + scale.total_height()
}

/// Events split into today's timeline entries and tomorrow's summary, keeping order.
pub fn split_by_day(events: &[ScheduledEvent]) -> (Vec<ScheduledEvent>, Vec<ScheduledEvent>) {
    events.iter().cloned().partition(ScheduledEvent::is_today)
}
