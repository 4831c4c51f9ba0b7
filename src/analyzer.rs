//! Dataset-level analysis
//!
//! [`Analyzer`] applies the per-row computation core across a whole dataset:
//! metrics for every observation date, and trend series for a single metric
//! or measurement point.

use chrono::NaiveDate;

use crate::loader::Dataset;
use crate::metrics::{compute_row_metrics_with_width, DEFAULT_CORRIDOR_WIDTH};
use crate::taxonomy::PointCode;
use crate::types::{Metric, Observation, RecommendationMode, RowMetrics};

/// Analyzer holding the recommendation mode and corridor width
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    mode: RecommendationMode,
    corridor_width: f64,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(RecommendationMode::Simple)
    }
}

impl Analyzer {
    /// Create an analyzer with the default corridor width
    pub fn new(mode: RecommendationMode) -> Self {
        Self {
            mode,
            corridor_width: DEFAULT_CORRIDOR_WIDTH,
        }
    }

    /// Create an analyzer with a specific corridor width
    pub fn with_corridor_width(mode: RecommendationMode, corridor_width: f64) -> Self {
        Self {
            mode,
            corridor_width,
        }
    }

    pub fn mode(&self) -> RecommendationMode {
        self.mode
    }

    pub fn corridor_width(&self) -> f64 {
        self.corridor_width
    }

    /// Metrics for one observation
    pub fn row_metrics(&self, observation: &Observation) -> RowMetrics {
        compute_row_metrics_with_width(observation, self.mode, self.corridor_width)
    }

    /// Metrics for every observation of the dataset, date-ascending
    pub fn dataset_metrics(&self, dataset: &Dataset) -> Vec<(NaiveDate, RowMetrics)> {
        dataset
            .observations()
            .iter()
            .map(|observation| (observation.date, self.row_metrics(observation)))
            .collect()
    }

    /// Trend series of one numeric metric over the dataset's dates.
    ///
    /// Dates where the metric is absent are skipped, not emitted as zeros.
    pub fn metric_series(&self, dataset: &Dataset, metric: Metric) -> Vec<(NaiveDate, f64)> {
        dataset
            .observations()
            .iter()
            .filter_map(|observation| {
                self.row_metrics(observation)
                    .metric(metric)
                    .map(|value| (observation.date, value))
            })
            .collect()
    }

    /// Trend series of one measurement point over the dataset's dates
    pub fn point_series(&self, dataset: &Dataset, code: PointCode) -> Vec<(NaiveDate, f64)> {
        dataset
            .observations()
            .iter()
            .filter_map(|observation| observation.get(code).map(|value| (observation.date, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Channel, ChannelGroup, Side};
    use std::str::FromStr;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn dataset() -> Dataset {
        let code = |s: &str| PointCode::from_str(s).unwrap();

        let mut day1 = Observation::new(date(10));
        day1.set(code("H1L"), Some(100.0));
        day1.set(code("H3L"), Some(120.0));

        // Day without any yin-left readings
        let mut day2 = Observation::new(date(11));
        day2.set(code("H4L"), Some(90.0));

        let mut day3 = Observation::new(date(12));
        day3.set(code("H1L"), Some(130.0));

        Dataset::from_observations(vec![day3, day1, day2])
    }

    #[test]
    fn test_dataset_metrics_ascending() {
        let analyzer = Analyzer::default();
        let metrics = analyzer.dataset_metrics(&dataset());

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].0, date(10));
        assert_eq!(metrics[2].0, date(12));
        assert_eq!(metrics[0].1.yin_left, Some(110.0));
    }

    #[test]
    fn test_metric_series_skips_absent() {
        let analyzer = Analyzer::default();
        let series = analyzer.metric_series(
            &dataset(),
            Metric::Group(ChannelGroup::Yin, Side::Left),
        );

        assert_eq!(series, vec![(date(10), 110.0), (date(12), 130.0)]);
    }

    #[test]
    fn test_point_series() {
        let analyzer = Analyzer::default();
        let series = analyzer.point_series(
            &dataset(),
            PointCode::new(Channel::H1, Side::Left),
        );

        assert_eq!(series, vec![(date(10), 100.0), (date(12), 130.0)]);
    }

    #[test]
    fn test_corridor_width_flows_through() {
        let analyzer = Analyzer::with_corridor_width(RecommendationMode::Simple, 0.2);
        let metrics = analyzer.dataset_metrics(&dataset());
        let corridor = metrics[1].1.corridor.unwrap();

        assert!((corridor.lower - 90.0 * 0.8).abs() < 1e-9);
        assert!((corridor.upper - 90.0 * 1.2).abs() < 1e-9);
    }
}
