//! Period-aligned request/error timeline.
//!
//! The timeline is always five buckets, oldest first. Bucket starts are
//! aligned to the period (see [`Period::align`]); the newest bucket ends at
//! `now` and may cover only part of a period.
//!
//! Membership is exclusive at both ends: a record stamped exactly on a
//! bucket boundary is counted in neither neighbour.

use super::period::Period;
use crate::parser::schema::{LogRecord, TimeBucket};
use crate::utils::config::BUCKET_COUNT;
use crate::utils::error::AnalyticsError;
use chrono::{DateTime, FixedOffset};
use log::debug;

/// Aligned start instants of the five buckets, oldest first
///
/// **Public** - also used to derive the default report window
pub fn bucket_starts(
    period: Period,
    now: DateTime<FixedOffset>,
) -> Result<Vec<DateTime<FixedOffset>>, AnalyticsError> {
    let mut starts = Vec::with_capacity(BUCKET_COUNT);
    let mut cursor = period.align(now)?;
    starts.push(cursor);

    while starts.len() < BUCKET_COUNT {
        cursor = period.step_back(cursor)?;
        starts.push(cursor);
    }

    starts.reverse();
    Ok(starts)
}

/// Count requests and errors per bucket
///
/// **Public** - main entry point for timeline aggregation
///
/// # Arguments
/// * `records` - Records to count (any order)
/// * `period` - Bucket granularity
/// * `now` - End of the newest bucket; its offset is the reporting timezone
///
/// # Returns
/// Exactly five buckets in chronological order
///
/// # Errors
/// * `AnalyticsError::TimeOutOfRange` - `now` is too close to the calendar limits
pub fn aggregate(
    records: &[LogRecord],
    period: Period,
    now: DateTime<FixedOffset>,
) -> Result<Vec<TimeBucket>, AnalyticsError> {
    let starts = bucket_starts(period, now)?;

    // Sorted once; each bucket is then two binary searches
    let mut stamps: Vec<(i64, bool)> = records
        .iter()
        .map(|r| (r.timestamp.saturating_mul(1000), r.is_error()))
        .collect();
    stamps.sort_unstable_by_key(|(ms, _)| *ms);

    let buckets: Vec<TimeBucket> = starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(now);
            let (start_ms, end_ms) = (start.timestamp_millis(), end.timestamp_millis());

            let lo = stamps.partition_point(|(ms, _)| *ms <= start_ms);
            let hi = stamps.partition_point(|(ms, _)| *ms < end_ms);
            let inside = if hi > lo { &stamps[lo..hi] } else { &[][..] };

            TimeBucket {
                label: period.label(start),
                start,
                end,
                request_count: inside.len() as u64,
                error_count: inside.iter().filter(|(_, is_error)| *is_error).count() as u64,
            }
        })
        .collect();

    debug!(
        "Aggregated {} records into {} {} buckets ({} counted)",
        records.len(),
        buckets.len(),
        period,
        buckets.iter().map(|b| b.request_count).sum::<u64>()
    );

    Ok(buckets)
}
