//! Layout measurement for the 24 hour blocks.
//!
//! A `TimelineScale` is an immutable snapshot of everything the mapping
//! needs. It is rebuilt as a whole on every measurement so readers never see
//! a mix of old and new geometry.

use crate::config::TimelineConfig;
use crate::time_of_day::HOURS_PER_DAY;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScale {
    hour_heights: [f64; HOURS_PER_DAY],
    minute_height: f64,
    label_height: f64,
    total_height: f64,
    viewport_height: f64,
    indicator_offset_ratio: f64,
    indicator_offset: f64,
    padding_top: f64,
    padding_bottom: f64,
}

impl TimelineScale {
    /// Scale used before the first layout pass: minimum-height blocks and no viewport.
    pub fn unmeasured(config: &TimelineConfig) -> Self {
        Self::measure(config, 0.0, &[])
    }

    /// Build a scale from rendered block heights.
    ///
    /// `rendered_heights[h]` is the height of hour `h`. Missing, zero,
    /// negative or non-finite readings, and readings under the configured
    /// minimum, are replaced by the minimum.
    pub fn measure(config: &TimelineConfig, viewport_height: f64, rendered_heights: &[f64]) -> Self {
        let min_height = config.min_hour_height;
        let mut hour_heights = [min_height; HOURS_PER_DAY];
        for (slot, &rendered) in hour_heights.iter_mut().zip(rendered_heights) {
            if rendered.is_finite() && rendered > min_height {
                *slot = rendered;
            }
        }

        let label_height = config.hour_label_height;
        let total_height =
            hour_heights.iter().sum::<f64>() + HOURS_PER_DAY as f64 * label_height;

        let viewport_height = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };
        let indicator_offset = viewport_height * config.indicator_offset_ratio;

        Self {
            hour_heights,
            minute_height: hour_heights[0] / 60.0,
            label_height,
            total_height,
            viewport_height,
            indicator_offset_ratio: config.indicator_offset_ratio,
            indicator_offset,
            padding_top: indicator_offset,
            padding_bottom: viewport_height - indicator_offset,
        }
    }

    /// Whether scroll commands may be derived from this scale.
    pub fn is_measured(&self) -> bool {
        self.viewport_height > 0.0 && self.total_height > 0.0
    }

    pub fn hour_heights(&self) -> &[f64; HOURS_PER_DAY] {
        &self.hour_heights
    }

    pub fn hour_height(&self, hour: u8) -> f64 {
        self.hour_heights[usize::from(hour).min(HOURS_PER_DAY - 1)]
    }

    /// Nominal pixels per minute, taken from hour 0. The mapping itself is
    /// per-hour and does not use this value.
    pub fn minute_height(&self) -> f64 {
        self.minute_height
    }

    pub fn label_height(&self) -> f64 {
        self.label_height
    }

    /// Sum of all hour blocks plus their label rows, without padding.
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn indicator_offset_ratio(&self) -> f64 {
        self.indicator_offset_ratio
    }

    /// Distance of the "now" indicator from the top of the viewport.
    pub fn indicator_offset(&self) -> f64 {
        self.indicator_offset
    }

    pub fn padding_top(&self) -> f64 {
        self.padding_top
    }

    pub fn padding_bottom(&self) -> f64 {
        self.padding_bottom
    }

    /// Height of the scrollable content including both paddings.
    pub fn content_height(&self) -> f64 {
        self.total_height + self.padding_top + self.padding_bottom
    }

    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// Cumulative height of every block (and its label) before `hour`.
    /// `hour == 24` yields the total height.
    pub fn height_before_hour(&self, hour: u8) -> f64 {
        let hour = usize::from(hour).min(HOURS_PER_DAY);
        self.hour_heights[..hour].iter().sum::<f64>() + hour as f64 * self.label_height
    }
}
