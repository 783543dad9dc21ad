use crate::time_of_day::MINUTES_PER_DAY;
use serde::{Deserialize, Serialize};

// ===== DEFAULTS =====

pub const DEFAULT_MIN_HOUR_HEIGHT: f64 = 120.0;
pub const DEFAULT_INDICATOR_OFFSET_RATIO: f64 = 0.25;
pub const DEFAULT_HOUR_LABEL_HEIGHT: f64 = 16.0;
pub const DEFAULT_SETTLE_DELAY_UNLOCKED_MS: u32 = 3_000;
pub const DEFAULT_SETTLE_DELAY_LOCKED_MS: u32 = 300;
pub const DEFAULT_CLOCK_INTERVAL_MS: u32 = 60_000;
pub const DEFAULT_EVENT_MINUTES: u32 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse timeline config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Tunables recognised by the timeline engine.
///
/// Every key is optional in TOML; missing keys fall back to the defaults
/// the "today" screen ships with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TimelineConfig {
    /// Hour blocks are never laid out shorter than this (px).
    pub min_hour_height: f64,
    /// Where the "now" indicator is pinned, as a fraction of viewport height.
    pub indicator_offset_ratio: f64,
    /// Height of the label row that accompanies every hour block (px).
    pub hour_label_height: f64,
    pub settle_delay_unlocked_ms: u32,
    pub settle_delay_locked_ms: u32,
    pub clock_interval_ms: u32,
    /// Rendered length of events that have no end time.
    pub default_event_minutes: u32,
    pub use_24_hour_labels: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_hour_height: DEFAULT_MIN_HOUR_HEIGHT,
            indicator_offset_ratio: DEFAULT_INDICATOR_OFFSET_RATIO,
            hour_label_height: DEFAULT_HOUR_LABEL_HEIGHT,
            settle_delay_unlocked_ms: DEFAULT_SETTLE_DELAY_UNLOCKED_MS,
            settle_delay_locked_ms: DEFAULT_SETTLE_DELAY_LOCKED_MS,
            clock_interval_ms: DEFAULT_CLOCK_INTERVAL_MS,
            default_event_minutes: DEFAULT_EVENT_MINUTES,
            use_24_hour_labels: false,
        }
    }
}

impl TimelineConfig {
    /// Parse and validate a TOML document. An empty document yields the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: TimelineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_px("min_hour_height", self.min_hour_height)?;
        if !self.hour_label_height.is_finite() || self.hour_label_height < 0.0 {
            return Err(invalid(
                "hour_label_height",
                format!("expected a finite, non-negative height, got {}", self.hour_label_height),
            ));
        }
        let ratio = self.indicator_offset_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
            return Err(invalid(
                "indicator_offset_ratio",
                format!("expected a fraction strictly between 0 and 1, got {ratio}"),
            ));
        }
        non_zero_ms("settle_delay_unlocked_ms", self.settle_delay_unlocked_ms)?;
        non_zero_ms("settle_delay_locked_ms", self.settle_delay_locked_ms)?;
        non_zero_ms("clock_interval_ms", self.clock_interval_ms)?;
        if self.default_event_minutes == 0 || self.default_event_minutes > MINUTES_PER_DAY {
            return Err(invalid(
                "default_event_minutes",
                format!("expected 1..={MINUTES_PER_DAY}, got {}", self.default_event_minutes),
            ));
        }
        Ok(())
    }

    /// Quiet period that has to pass without scroll input before the view settles.
    pub fn settle_delay_ms(&self, locked: bool) -> u32 {
        if locked {
            self.settle_delay_locked_ms
        } else {
            self.settle_delay_unlocked_ms
        }
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

fn positive_px(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(key, format!("expected a finite, positive height, got {value}")))
    }
}

fn non_zero_ms(key: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(invalid(key, "duration must be greater than zero".to_string()))
    } else {
        Ok(())
    }
}
