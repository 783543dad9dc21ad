//! Conversion between time of day and scroll position.
//!
//! Content offsets are measured from the top of the first hour block;
//! scroll offsets are what the scroll container reports and accepts. Both
//! directions work on a single `TimelineScale` snapshot and use the height of
//! the hour being mapped, so variable-height blocks stay consistent.

use crate::scale::TimelineScale;
use crate::time_of_day::{MINUTES_PER_HOUR, TimeOfDay};

/// Positions this close to a block boundary belong to the later block.
const BOUNDARY_EPSILON_PX: f64 = 1e-6;
/// Absorbs float error when a mapped position lands exactly on a minute line.
const MINUTE_EPSILON: f64 = 1e-6;

impl TimelineScale {
    /// Offset of `time` inside the hour content, without padding.
    pub fn time_to_content_offset(&self, time: TimeOfDay) -> f64 {
        let hour = time.hour();
        let minute_fraction = f64::from(time.minute()) / f64::from(MINUTES_PER_HOUR);
        self.height_before_hour(hour) + minute_fraction * self.hour_height(hour)
    }

    /// Scroll offset that puts `time` under the indicator.
    ///
    /// `None` until the scale has been measured, so callers skip the scroll
    /// command instead of scrolling to a meaningless offset.
    pub fn time_to_scroll_offset(&self, time: TimeOfDay) -> Option<f64> {
        self.is_measured().then(|| {
            self.time_to_content_offset(time) + self.padding_top() - self.indicator_offset()
        })
    }

    /// Time currently under the indicator for a raw scroll offset.
    pub fn scroll_offset_to_time(&self, scroll_offset: f64) -> TimeOfDay {
        if !scroll_offset.is_finite() {
            return TimeOfDay::MIDNIGHT;
        }
        let adjusted = (scroll_offset + self.indicator_offset() - self.padding_top()).max(0.0);
        self.content_offset_to_time(adjusted)
    }

    /// Inverse of [`TimelineScale::time_to_content_offset`].
    ///
    /// The label row of every block is not part of the hour: positions inside
    /// it resolve to minute 59 of the block it follows.
    pub fn content_offset_to_time(&self, content_offset: f64) -> TimeOfDay {
        if content_offset.is_nan() || content_offset <= 0.0 {
            return TimeOfDay::MIDNIGHT;
        }
        if content_offset >= self.total_height() {
            return TimeOfDay::LAST_MINUTE;
        }

        let label_height = self.label_height();
        let mut accumulated = 0.0;
        for (hour, &hour_height) in self.hour_heights().iter().enumerate() {
            let stride = hour_height + label_height;
            if accumulated + stride > content_offset + BOUNDARY_EPSILON_PX {
                let hour = hour as u32;
                let remainder = content_offset - accumulated;
                if remainder >= hour_height {
                    return TimeOfDay::from_minutes(hour * MINUTES_PER_HOUR + 59);
                }
                let minutes = ((remainder / hour_height) * f64::from(MINUTES_PER_HOUR)
                    + MINUTE_EPSILON)
                    .floor()
                    .clamp(0.0, 59.0) as u32;
                return TimeOfDay::from_minutes(hour * MINUTES_PER_HOUR + minutes);
            }
            accumulated += stride;
        }
        TimeOfDay::LAST_MINUTE
    }
}
