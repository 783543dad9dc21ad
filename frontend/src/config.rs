//! Embedded configuration and agenda for the Today screen.

use shared::{ScheduledEvent, TimelineConfig, load_events_from_toml};

const TIMELINE_CONFIG_TOML: &str = include_str!("../today.toml");
const SAMPLE_EVENTS_TOML: &str = include_str!("../sample_events.toml");

/// Timeline tunables; invalid documents fall back to the defaults.
pub fn load_timeline_config() -> TimelineConfig {
    match TimelineConfig::from_toml_str(TIMELINE_CONFIG_TOML) {
        Ok(config) => config,
        Err(error) => {
            zoon::eprintln!("Timeline config rejected, using defaults: {error}");
            TimelineConfig::default()
        }
    }
}

/// Agenda entries; an invalid document leaves the agenda empty.
pub fn load_sample_events() -> Vec<ScheduledEvent> {
    match load_events_from_toml(SAMPLE_EVENTS_TOML) {
        Ok(events) => events,
        Err(error) => {
            zoon::eprintln!("Sample events rejected: {error}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{EventDay, split_by_day};

    #[test]
    fn embedded_config_is_valid() {
        let config = TimelineConfig::from_toml_str(TIMELINE_CONFIG_TOML).unwrap();
        assert_eq!(config, TimelineConfig::default());
    }

    #[test]
    fn embedded_agenda_has_today_and_tomorrow() {
        let events = load_events_from_toml(SAMPLE_EVENTS_TOML).unwrap();
        let (today, tomorrow) = split_by_day(&events);
        assert_eq!(today.len(), 3);
        assert_eq!(tomorrow.len(), 2);
        assert_eq!(today[0].title, "Morning Coffee");
        assert!(tomorrow.iter().all(|event| event.day == EventDay::Tomorrow));
    }
}
