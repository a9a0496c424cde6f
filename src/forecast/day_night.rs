//! Day/night aggregation of forecast samples
//!
//! Samples are bucketed by calendar date and by a fixed day window
//! (`DAY_START_HOUR <= hour < DAY_END_HOUR`), using the naive timestamp as
//! delivered by the provider. No timezone conversion is applied here.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::Mean;
use crate::data::ForecastSample;

/// First hour (inclusive) that counts as daytime
pub const DAY_START_HOUR: u32 = 6;

/// First hour (exclusive) that no longer counts as daytime
pub const DAY_END_HOUR: u32 = 18;

/// Half of a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Day,
    Night,
}

impl Period {
    /// Classifies an hour of day (0-23)
    pub fn from_hour(hour: u32) -> Self {
        if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
            Period::Day
        } else {
            Period::Night
        }
    }

    /// Classifies a timestamp by its hour of day
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self::from_hour(timestamp.hour())
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Day => "Day",
            Period::Night => "Night",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key of a day/night bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub date: NaiveDate,
    pub period: Period,
}

impl BucketKey {
    /// The bucket a sample belongs to
    pub fn for_sample(sample: &ForecastSample) -> Self {
        Self {
            date: sample.timestamp.date(),
            period: Period::of(sample.timestamp),
        }
    }
}

/// Aggregates for one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    pub mean_temperature: f64,
    pub mean_humidity: f64,
    pub sample_count: usize,
}

/// Day/night buckets with their roll-ups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayNightSummary {
    buckets: BTreeMap<BucketKey, BucketStats>,
    daily_averages: BTreeMap<NaiveDate, f64>,
}

impl DayNightSummary {
    /// Buckets samples by (date, period) and computes the roll-ups
    ///
    /// Only keys that actually occur in `samples` get a bucket.
    pub fn from_samples(samples: &[ForecastSample]) -> Self {
        let mut groups: BTreeMap<BucketKey, (Mean, Mean)> = BTreeMap::new();
        let mut days: BTreeMap<NaiveDate, Mean> = BTreeMap::new();

        for sample in samples {
            let (temperature, humidity) = groups.entry(BucketKey::for_sample(sample)).or_default();
            temperature.push(sample.temperature);
            humidity.push(f64::from(sample.humidity));

            days.entry(sample.timestamp.date())
                .or_default()
                .push(sample.temperature);
        }

        let buckets = groups
            .into_iter()
            .filter_map(|(key, (temperature, humidity))| {
                Some((
                    key,
                    BucketStats {
                        mean_temperature: temperature.value()?,
                        mean_humidity: humidity.value()?,
                        sample_count: temperature.count(),
                    },
                ))
            })
            .collect();

        let daily_averages = days
            .into_iter()
            .filter_map(|(date, mean)| mean.value().map(|value| (date, value)))
            .collect();

        Self {
            buckets,
            daily_averages,
        }
    }

    /// All buckets, ordered by date then Day before Night
    pub fn buckets(&self) -> &BTreeMap<BucketKey, BucketStats> {
        &self.buckets
    }

    pub fn get(&self, date: NaiveDate, period: Period) -> Option<&BucketStats> {
        self.buckets.get(&BucketKey { date, period })
    }

    /// Distinct dates that have at least one sample
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.daily_averages.keys().copied().collect()
    }

    /// Mean temperature of all samples on a date
    pub fn daily_average(&self, date: NaiveDate) -> Option<f64> {
        self.daily_averages.get(&date).copied()
    }

    /// Mean of the bucket temperature means for one period
    ///
    /// Returns `None` when no bucket of that period exists.
    pub fn period_average(&self, period: Period) -> Option<f64> {
        let mut mean = Mean::default();
        for stats in self
            .buckets
            .iter()
            .filter(|(key, _)| key.period == period)
            .map(|(_, stats)| stats)
        {
            mean.push(stats.mean_temperature);
        }
        mean.value()
    }

    pub fn day_average(&self) -> Option<f64> {
        self.period_average(Period::Day)
    }

    pub fn night_average(&self) -> Option<f64> {
        self.period_average(Period::Night)
    }

    /// Day average minus night average, signed
    ///
    /// Returns `None` if either side has no data.
    pub fn difference(&self) -> Option<f64> {
        Some(self.day_average()? - self.night_average()?)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::sample_at;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_boundaries() {
        assert_eq!(Period::from_hour(5), Period::Night);
        assert_eq!(Period::from_hour(6), Period::Day);
        assert_eq!(Period::from_hour(17), Period::Day);
        assert_eq!(Period::from_hour(18), Period::Night);
        assert_eq!(Period::from_hour(0), Period::Night);
        assert_eq!(Period::from_hour(23), Period::Night);
    }

    #[test]
    fn test_period_of_timestamp_ignores_minutes() {
        let sample = sample_at("2024-01-01 17:59:59", 0.0, 0);
        assert_eq!(Period::of(sample.timestamp), Period::Day);
        let sample = sample_at("2024-01-01 05:59:59", 0.0, 0);
        assert_eq!(Period::of(sample.timestamp), Period::Night);
    }

    #[test]
    fn test_every_sample_lands_in_exactly_one_bucket() {
        let samples = vec![
            sample_at("2024-01-01 00:00:00", 1.0, 80),
            sample_at("2024-01-01 03:00:00", 2.0, 80),
            sample_at("2024-01-01 06:00:00", 5.0, 70),
            sample_at("2024-01-01 09:00:00", 8.0, 60),
            sample_at("2024-01-01 21:00:00", 3.0, 85),
            sample_at("2024-01-02 12:00:00", 9.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);

        let total: usize = summary.buckets().values().map(|s| s.sample_count).sum();
        assert_eq!(total, samples.len());

        let keys: Vec<BucketKey> = summary.buckets().keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                BucketKey {
                    date: date(2024, 1, 1),
                    period: Period::Day,
                },
                BucketKey {
                    date: date(2024, 1, 1),
                    period: Period::Night,
                },
                BucketKey {
                    date: date(2024, 1, 2),
                    period: Period::Day,
                },
            ]
        );
        assert!(summary.get(date(2024, 1, 2), Period::Night).is_none());
    }

    #[test]
    fn test_bucket_means() {
        let samples = vec![
            sample_at("2024-01-01 06:00:00", 10.0, 60),
            sample_at("2024-01-01 09:00:00", 14.0, 70),
            sample_at("2024-01-01 21:00:00", 4.0, 90),
        ];
        let summary = DayNightSummary::from_samples(&samples);

        let day = summary.get(date(2024, 1, 1), Period::Day).unwrap();
        assert!((day.mean_temperature - 12.0).abs() < 1e-9);
        assert!((day.mean_humidity - 65.0).abs() < 1e-9);
        assert_eq!(day.sample_count, 2);

        let night = summary.get(date(2024, 1, 1), Period::Night).unwrap();
        assert!((night.mean_temperature - 4.0).abs() < 1e-9);
        assert!((night.mean_humidity - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_average_uses_all_samples_not_period_means() {
        // 5 day samples averaging 20.0 and 1 night sample at 8.0
        let samples = vec![
            sample_at("2024-01-01 03:00:00", 8.0, 50),
            sample_at("2024-01-01 06:00:00", 18.0, 50),
            sample_at("2024-01-01 09:00:00", 19.0, 50),
            sample_at("2024-01-01 12:00:00", 20.0, 50),
            sample_at("2024-01-01 15:00:00", 21.0, 50),
            sample_at("2024-01-01 17:00:00", 22.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);

        let daily = summary.daily_average(date(2024, 1, 1)).unwrap();
        assert!((daily - 18.0).abs() < 1e-9);

        // The mean of the two period means would be 14.0
        let day = summary.get(date(2024, 1, 1), Period::Day).unwrap().mean_temperature;
        let night = summary.get(date(2024, 1, 1), Period::Night).unwrap().mean_temperature;
        assert!(((day + night) / 2.0 - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_difference_is_signed() {
        let samples = vec![
            sample_at("2024-01-01 12:00:00", 20.0, 50),
            sample_at("2024-01-01 21:00:00", 12.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);

        assert!((summary.day_average().unwrap() - 20.0).abs() < 1e-9);
        assert!((summary.night_average().unwrap() - 12.0).abs() < 1e-9);
        assert!((summary.difference().unwrap() - 8.0).abs() < 1e-9);

        let inverted = vec![
            sample_at("2024-01-01 12:00:00", 12.0, 50),
            sample_at("2024-01-01 21:00:00", 20.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&inverted);
        assert!((summary.difference().unwrap() - (-8.0)).abs() < 1e-9);
    }

    #[test]
    fn test_period_average_is_mean_of_bucket_means() {
        // Day buckets: Jan 1 = mean(10, 20) = 15, Jan 2 = 30 -> day average 22.5
        let samples = vec![
            sample_at("2024-01-01 09:00:00", 10.0, 50),
            sample_at("2024-01-01 12:00:00", 20.0, 50),
            sample_at("2024-01-02 12:00:00", 30.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);
        assert!((summary.day_average().unwrap() - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_night_samples_reports_no_data() {
        let samples = vec![
            sample_at("2024-01-01 09:00:00", 15.0, 50),
            sample_at("2024-01-01 12:00:00", 18.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);

        assert!(summary.day_average().is_some());
        assert_eq!(summary.night_average(), None);
        assert_eq!(summary.difference(), None);
    }

    #[test]
    fn test_empty_input() {
        let summary = DayNightSummary::from_samples(&[]);
        assert!(summary.is_empty());
        assert!(summary.dates().is_empty());
        assert_eq!(summary.day_average(), None);
        assert_eq!(summary.night_average(), None);
        assert_eq!(summary.difference(), None);
    }

    #[test]
    fn test_dates_are_sorted_and_distinct() {
        let samples = vec![
            sample_at("2024-01-01 21:00:00", 1.0, 50),
            sample_at("2024-01-02 00:00:00", 1.0, 50),
            sample_at("2024-01-02 12:00:00", 1.0, 50),
            sample_at("2024-01-03 03:00:00", 1.0, 50),
        ];
        let summary = DayNightSummary::from_samples(&samples);
        assert_eq!(
            summary.dates(),
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }
}
