//! Forward-looking time window for charts

use chrono::{Duration, NaiveDateTime};

use crate::data::ForecastSample;

/// Length of the chart window in days
pub const CHART_WINDOW_DAYS: i64 = 7;

/// Samples with `now <= timestamp <= now + CHART_WINDOW_DAYS`
///
/// `samples` must be ordered by timestamp, which makes the result a
/// contiguous slice. Both bounds are inclusive.
pub fn chart_window(samples: &[ForecastSample], now: NaiveDateTime) -> &[ForecastSample] {
    window(samples, now, now + Duration::days(CHART_WINDOW_DAYS))
}

/// Samples with `start <= timestamp <= end`
pub fn window(
    samples: &[ForecastSample],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> &[ForecastSample] {
    if end < start {
        return &[];
    }
    let first = samples.partition_point(|s| s.timestamp < start);
    let last = samples.partition_point(|s| s.timestamp <= end);
    &samples[first..last.max(first)]
}
