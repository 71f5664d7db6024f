//! Resolution of the requested time window.
//!
//! Named periods default to the span covered by their five buckets, ending
//! at the explicit end or now. Custom windows must name both bounds. Whatever the request, the
//! window end is the instant the timeline is anchored to.

use super::period::Period;
use super::time_buckets::bucket_starts;
use crate::utils::error::{AnalyticsError, ConfigError};
use chrono::{DateTime, FixedOffset, TimeZone};
use log::debug;
use serde::{Deserialize, Serialize};

/// A resolved window, epoch seconds, inclusive at both ends for record selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Period name as requested
    pub requested: String,

    /// Period used for bucketing
    pub period: Period,

    pub start: i64,

    pub end: i64,
}

impl TimeWindow {
    /// Resolve a window request
    ///
    /// # Arguments
    /// * `requested` - hourly, daily, weekly, monthly or custom (anything else buckets monthly)
    /// * `start` / `end` - Optional explicit bounds, epoch seconds
    /// * `now` - Current instant in the reporting timezone
    ///
    /// # Errors
    /// * `ConfigError::MissingWindowBound` - custom window without both bounds
    /// * `ConfigError::InvalidWindow` - end not after start
    pub fn resolve(
        requested: &str,
        start: Option<i64>,
        end: Option<i64>,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, ConfigError> {
        let requested = requested.trim();
        let period = Period::parse_lenient(requested);

        let (start, end) = if Period::is_custom(requested) {
            (
                start.ok_or(ConfigError::MissingWindowBound("start"))?,
                end.ok_or(ConfigError::MissingWindowBound("end"))?,
            )
        } else {
            let end = end.unwrap_or(now.timestamp());
            let start = match start {
                Some(start) => start,
                None => default_start(period, end, now.timezone())?,
            };
            (start, end)
        };

        if end <= start {
            return Err(ConfigError::InvalidWindow { start, end });
        }

        debug!("Resolved {} window: {}..={} ({} buckets)", requested, start, end, period);

        Ok(Self {
            requested: requested.to_string(),
            period,
            start,
            end,
        })
    }

    /// Window end as an instant in `offset`, the anchor of the timeline
    pub fn end_at(&self, offset: FixedOffset) -> Result<DateTime<FixedOffset>, AnalyticsError> {
        offset
            .timestamp_opt(self.end, 0)
            .single()
            .ok_or_else(|| AnalyticsError::TimeOutOfRange(self.end.to_string()))
    }

    pub fn duration_secs(&self) -> i64 {
        self.end - self.start
    }
}

/// First bucket start of the timeline anchored at `end`
fn default_start(period: Period, end: i64, offset: FixedOffset) -> Result<i64, ConfigError> {
    let anchor = offset
        .timestamp_opt(end, 0)
        .single()
        .ok_or_else(|| ConfigError::WindowOutOfRange(end.to_string()))?;

    let starts =
        bucket_starts(period, anchor).map_err(|e| ConfigError::WindowOutOfRange(e.to_string()))?;

    Ok(starts.first().map_or(end, |s| s.timestamp()))
}
