//! Cloud coverage summary and date x hour pivot

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Timelike};

use super::Mean;
use crate::data::ForecastSample;

/// Mean coverage strictly above this is overcast
pub const HIGH_CLOUD_THRESHOLD: f64 = 70.0;

/// Mean coverage at or below this is mostly clear
pub const LOW_CLOUD_THRESHOLD: f64 = 30.0;

/// Qualitative cloud coverage band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudBand {
    /// Mostly clear skies
    Low,
    /// Partly cloudy
    Moderate,
    /// Overcast
    High,
}

impl CloudBand {
    /// Classifies a mean coverage percentage
    pub fn classify(mean_coverage: f64) -> Self {
        if mean_coverage > HIGH_CLOUD_THRESHOLD {
            CloudBand::High
        } else if mean_coverage > LOW_CLOUD_THRESHOLD {
            CloudBand::Moderate
        } else {
            CloudBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CloudBand::Low => "Low cloud coverage",
            CloudBand::Moderate => "Moderate cloud coverage",
            CloudBand::High => "High cloud coverage",
        }
    }

    /// What the sky is likely to look like
    pub fn outlook(self) -> &'static str {
        match self {
            CloudBand::Low => "Mostly clear skies",
            CloudBand::Moderate => "Partly cloudy conditions",
            CloudBand::High => "Expect overcast conditions",
        }
    }
}

/// Mean cloud coverage over a forecast and its band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSummary {
    pub mean_coverage: f64,
    pub band: CloudBand,
}

impl CloudSummary {
    /// Summarizes the full sample set; `None` for an empty forecast
    pub fn from_samples(samples: &[ForecastSample]) -> Option<Self> {
        let mut mean = Mean::default();
        for sample in samples {
            mean.push(f64::from(sample.cloud_coverage));
        }
        let mean_coverage = mean.value()?;
        Some(Self {
            mean_coverage,
            band: CloudBand::classify(mean_coverage),
        })
    }
}

/// Cloud coverage keyed by (date, hour of day)
///
/// Colliding (date, hour) pairs hold the mean of their samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloudPivot {
    cells: BTreeMap<NaiveDate, BTreeMap<u32, f64>>,
}

impl CloudPivot {
    pub fn from_samples(samples: &[ForecastSample]) -> Self {
        let mut groups: BTreeMap<NaiveDate, BTreeMap<u32, Mean>> = BTreeMap::new();

        for sample in samples {
            groups
                .entry(sample.timestamp.date())
                .or_default()
                .entry(sample.timestamp.hour())
                .or_default()
                .push(f64::from(sample.cloud_coverage));
        }

        let cells = groups
            .into_iter()
            .map(|(date, hours)| {
                let row = hours
                    .into_iter()
                    .filter_map(|(hour, mean)| mean.value().map(|value| (hour, value)))
                    .collect();
                (date, row)
            })
            .collect();

        Self { cells }
    }

    /// Rows of the heatmap, in date order
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.cells.keys().copied().collect()
    }

    /// Columns of the heatmap: every hour present on any date, ascending
    pub fn hours(&self) -> Vec<u32> {
        self.cells
            .values()
            .flat_map(|row| row.keys().copied())
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }

    pub fn get(&self, date: NaiveDate, hour: u32) -> Option<f64> {
        self.cells.get(&date).and_then(|row| row.get(&hour)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
