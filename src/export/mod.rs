//! Report export
//!
//! All writers serialize the same report rows: one row per observation date
//! with the 25 metrics in canonical order. Numbers are rounded to one
//! decimal at serialization time; absent values render empty.

pub mod csv;
pub mod json;
pub mod pdf;
pub mod xlsx;

pub use self::csv::write_csv;
pub use self::json::{report_payload, write_json, ReportPayload};
pub use self::pdf::write_pdf;
pub use self::xlsx::write_xlsx;

use chrono::NaiveDate;

use crate::analyzer::Analyzer;
use crate::loader::Dataset;
use crate::types::MetricValue;

/// Name of the date column in tabular exports
pub const DATE_COLUMN: &str = "Date";

/// Metric column names in output order
pub const METRIC_COLUMNS: [&str; 25] = [
    "Yin_L",
    "Yin_R",
    "Yang_L",
    "Yang_R",
    "Hands_L",
    "Hands_R",
    "Feet_L",
    "Feet_R",
    "Inner_L",
    "Inner_R",
    "Outer_L",
    "Outer_R",
    "MeanAll",
    "CorridorLower",
    "CorridorUpper",
    "MaxCode",
    "MaxValue",
    "MaxMeridian",
    "MaxAction",
    "MaxRecommendPoint",
    "MinCode",
    "MinValue",
    "MinMeridian",
    "MinAction",
    "MinRecommendPoint",
];

/// One report row: a date plus the ordered metrics mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub values: Vec<(&'static str, MetricValue)>,
}

impl ReportRow {
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Compute report rows for every observation of the dataset, date-ascending
pub fn report_rows(analyzer: &Analyzer, dataset: &Dataset) -> Vec<ReportRow> {
    analyzer
        .dataset_metrics(dataset)
        .into_iter()
        .map(|(date, metrics)| ReportRow {
            date,
            values: metrics.to_pairs(),
        })
        .collect()
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_row_metrics;
    use crate::types::{Observation, RecommendationMode};

    #[test]
    fn test_metric_columns_match_pair_order() {
        let metrics = compute_row_metrics(
            &Observation::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()),
            RecommendationMode::Simple,
        );
        let names: Vec<&str> = metrics.to_pairs().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, METRIC_COLUMNS);
    }

    #[test]
    fn test_report_rows_sorted_by_date() {
        let rows = test_support::sample_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_string(), "2024-03-10");
        assert_eq!(rows[1].date_string(), "2024-03-11");
        assert_eq!(rows[0].values.len(), 25);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(156.66), 156.7);
        assert_eq!(round1(132.9375), 132.9);
        assert_eq!(round1(150.0), 150.0);
    }
}
