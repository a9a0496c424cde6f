//! Forecast aggregation
//!
//! Pure functions over normalized [`ForecastSample`]s: day/night buckets and
//! roll-ups, the forward-looking chart window, and cloud coverage statistics.
//! Nothing in here performs I/O.

pub mod clouds;
pub mod day_night;
pub mod window;

pub use clouds::{CloudBand, CloudPivot, CloudSummary};
pub use day_night::{BucketKey, BucketStats, DayNightSummary, Period};
pub use window::chart_window;

use chrono::{Duration, NaiveDateTime};

use crate::data::ForecastSample;

/// Running arithmetic mean
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// `None` until at least one value was pushed
    pub(crate) fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Everything the dashboard derives from one forecast fetch
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// Full, ordered sample set
    samples: Vec<ForecastSample>,
    /// Reference instant used for the chart window
    now: NaiveDateTime,
    pub day_night: DayNightSummary,
    pub clouds: Option<CloudSummary>,
    pub cloud_pivot: CloudPivot,
}

impl ForecastReport {
    /// Aggregates a forecast; `now` anchors the chart window
    pub fn build(samples: Vec<ForecastSample>, now: NaiveDateTime) -> Self {
        let day_night = DayNightSummary::from_samples(&samples);
        let clouds = CloudSummary::from_samples(&samples);
        let cloud_pivot = CloudPivot::from_samples(&samples);

        Self {
            samples,
            now,
            day_night,
            clouds,
            cloud_pivot,
        }
    }

    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    /// Samples in the forward-looking chart window
    pub fn chart_samples(&self) -> &[ForecastSample] {
        chart_window(&self.samples, self.now)
    }

    /// Inclusive bounds of the chart window
    pub fn chart_range(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.now,
            self.now + Duration::days(window::CHART_WINDOW_DAYS),
        )
    }
}
