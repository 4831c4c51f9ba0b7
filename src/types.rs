//! Core types for Riodoraku analytics
//!
//! This module defines the data structures that flow through the computation
//! core: one dated observation of up to 24 point readings, the derived
//! corridor and extreme points, and the per-row metrics output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;
use crate::taxonomy::{ChannelGroup, PointCode, Side, GROUP_ORDER};

/// One observation: a date plus up to 24 readings keyed by point code.
///
/// Absent readings are simply not present in the map; they are excluded from
/// every aggregate rather than treated as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date (no time component)
    pub date: NaiveDate,
    /// Name of the CSV file this row came from, for provenance
    pub source_file: Option<String>,
    readings: BTreeMap<PointCode, f64>,
}

impl Observation {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            source_file: None,
            readings: BTreeMap::new(),
        }
    }

    /// Build an observation from `(code, value)` pairs
    pub fn with_readings<I>(date: NaiveDate, readings: I) -> Self
    where
        I: IntoIterator<Item = (PointCode, f64)>,
    {
        Self {
            date,
            source_file: None,
            readings: readings.into_iter().collect(),
        }
    }

    /// Set or clear one reading
    pub fn set(&mut self, code: PointCode, value: Option<f64>) {
        match value {
            Some(v) => {
                self.readings.insert(code, v);
            }
            None => {
                self.readings.remove(&code);
            }
        }
    }

    pub fn get(&self, code: PointCode) -> Option<f64> {
        self.readings.get(&code).copied()
    }

    /// Present readings in canonical point order
    pub fn readings(&self) -> impl Iterator<Item = (PointCode, f64)> + '_ {
        self.readings.iter().map(|(code, value)| (*code, *value))
    }

    /// Number of present readings (0..=24)
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    /// True when all 24 readings are absent
    pub fn is_blank(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Corrective action attached to an extreme point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Calm an overactive meridian (attached to the maximum)
    Sedate,
    /// Stimulate an underactive meridian (attached to the minimum)
    Tonify,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Sedate => "sedate",
            Action::Tonify => "tonify",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation mode for extreme points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Report the action only
    #[default]
    Simple,
    /// Attach the therapeutic point from the five-element table
    FiveElements,
}

impl RecommendationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationMode::Simple => "simple",
            RecommendationMode::FiveElements => "five_elements",
        }
    }
}

impl FromStr for RecommendationMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(RecommendationMode::Simple),
            "five_elements" => Ok(RecommendationMode::FiveElements),
            other => Err(AnalysisError::UnknownRecommendationMode(other.to_string())),
        }
    }
}

/// Normal-range corridor derived from the overall mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Mean of all present readings among the 24 point codes
    pub mean_all: f64,
    /// Lower bound, `mean_all * (1 - width)`
    pub lower: f64,
    /// Upper bound, `mean_all * (1 + width)`
    pub upper: f64,
}

/// One extreme reading (the highest or lowest among the 24)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremePoint {
    /// Point code of the extreme reading, e.g. `H1L`
    pub code: PointCode,
    pub value: f64,
    /// Meridian name of the code's channel
    pub meridian: String,
    pub action: Action,
    /// Therapeutic point from the five-element table (five-element mode only)
    pub recommend_point: Option<String>,
}

/// Per-row metrics: 12 grouped means, the corridor, and the two extremes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    pub yin_left: Option<f64>,
    pub yin_right: Option<f64>,
    pub yang_left: Option<f64>,
    pub yang_right: Option<f64>,
    pub hands_left: Option<f64>,
    pub hands_right: Option<f64>,
    pub feet_left: Option<f64>,
    pub feet_right: Option<f64>,
    pub inner_left: Option<f64>,
    pub inner_right: Option<f64>,
    pub outer_left: Option<f64>,
    pub outer_right: Option<f64>,
    pub corridor: Option<Corridor>,
    pub max_point: Option<ExtremePoint>,
    pub min_point: Option<ExtremePoint>,
}

impl RowMetrics {
    /// Grouped mean for one group axis and side
    pub fn group_mean(&self, group: ChannelGroup, side: Side) -> Option<f64> {
        match (group, side) {
            (ChannelGroup::Yin, Side::Left) => self.yin_left,
            (ChannelGroup::Yin, Side::Right) => self.yin_right,
            (ChannelGroup::Yang, Side::Left) => self.yang_left,
            (ChannelGroup::Yang, Side::Right) => self.yang_right,
            (ChannelGroup::Hands, Side::Left) => self.hands_left,
            (ChannelGroup::Hands, Side::Right) => self.hands_right,
            (ChannelGroup::Feet, Side::Left) => self.feet_left,
            (ChannelGroup::Feet, Side::Right) => self.feet_right,
            (ChannelGroup::Inner, Side::Left) => self.inner_left,
            (ChannelGroup::Inner, Side::Right) => self.inner_right,
            (ChannelGroup::Outer, Side::Left) => self.outer_left,
            (ChannelGroup::Outer, Side::Right) => self.outer_right,
        }
    }

    /// Value of one named numeric metric
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::MeanAll => self.corridor.map(|c| c.mean_all),
            Metric::CorridorLower => self.corridor.map(|c| c.lower),
            Metric::CorridorUpper => self.corridor.map(|c| c.upper),
            Metric::Group(group, side) => self.group_mean(group, side),
        }
    }

    /// All 25 output fields as ordered `(name, value)` pairs.
    ///
    /// The order is fixed: the 12 grouped means, the 3 corridor fields, the
    /// 5 maximum fields, the 5 minimum fields.
    pub fn to_pairs(&self) -> Vec<(&'static str, MetricValue)> {
        let mut pairs = Vec::with_capacity(25);
        for group in GROUP_ORDER {
            for side in [Side::Left, Side::Right] {
                pairs.push((
                    Metric::Group(group, side).as_str(),
                    MetricValue::from_number(self.group_mean(group, side)),
                ));
            }
        }
        pairs.push(("MeanAll", MetricValue::from_number(self.metric(Metric::MeanAll))));
        pairs.push((
            "CorridorLower",
            MetricValue::from_number(self.metric(Metric::CorridorLower)),
        ));
        pairs.push((
            "CorridorUpper",
            MetricValue::from_number(self.metric(Metric::CorridorUpper)),
        ));
        push_extreme_pairs(&mut pairs, self.max_point.as_ref(), ExtremeNames::MAX);
        push_extreme_pairs(&mut pairs, self.min_point.as_ref(), ExtremeNames::MIN);
        pairs
    }
}

struct ExtremeNames {
    code: &'static str,
    value: &'static str,
    meridian: &'static str,
    action: &'static str,
    recommend: &'static str,
}

impl ExtremeNames {
    const MAX: ExtremeNames = ExtremeNames {
        code: "MaxCode",
        value: "MaxValue",
        meridian: "MaxMeridian",
        action: "MaxAction",
        recommend: "MaxRecommendPoint",
    };
    const MIN: ExtremeNames = ExtremeNames {
        code: "MinCode",
        value: "MinValue",
        meridian: "MinMeridian",
        action: "MinAction",
        recommend: "MinRecommendPoint",
    };
}

fn push_extreme_pairs(
    pairs: &mut Vec<(&'static str, MetricValue)>,
    point: Option<&ExtremePoint>,
    names: ExtremeNames,
) {
    match point {
        Some(p) => {
            pairs.push((names.code, MetricValue::Text(p.code.to_string())));
            pairs.push((names.value, MetricValue::Number(p.value)));
            pairs.push((names.meridian, MetricValue::Text(p.meridian.clone())));
            pairs.push((names.action, MetricValue::Text(p.action.to_string())));
            pairs.push((
                names.recommend,
                match &p.recommend_point {
                    Some(point) => MetricValue::Text(point.clone()),
                    None => MetricValue::Text(String::new()),
                },
            ));
        }
        None => {
            pairs.push((names.code, MetricValue::Missing));
            pairs.push((names.value, MetricValue::Missing));
            pairs.push((names.meridian, MetricValue::Missing));
            pairs.push((names.action, MetricValue::Missing));
            pairs.push((names.recommend, MetricValue::Missing));
        }
    }
}

/// One cell of the metrics mapping: a number, a text label, or absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    Missing,
}

impl MetricValue {
    pub fn from_number(value: Option<f64>) -> Self {
        match value {
            Some(v) => MetricValue::Number(v),
            None => MetricValue::Missing,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Render for tables and exports: numbers to one decimal, absent as empty
    pub fn render(&self) -> String {
        match self {
            MetricValue::Number(v) => format!("{v:.1}"),
            MetricValue::Text(s) => s.clone(),
            MetricValue::Missing => String::new(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Named numeric metric, usable for trend series and chart selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Group(ChannelGroup, Side),
    MeanAll,
    CorridorLower,
    CorridorUpper,
}

impl Metric {
    /// All numeric metrics in output order
    pub fn all() -> Vec<Metric> {
        let mut metrics = Vec::with_capacity(15);
        for group in GROUP_ORDER {
            for side in [Side::Left, Side::Right] {
                metrics.push(Metric::Group(group, side));
            }
        }
        metrics.push(Metric::MeanAll);
        metrics.push(Metric::CorridorLower);
        metrics.push(Metric::CorridorUpper);
        metrics
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Group(ChannelGroup::Yin, Side::Left) => "Yin_L",
            Metric::Group(ChannelGroup::Yin, Side::Right) => "Yin_R",
            Metric::Group(ChannelGroup::Yang, Side::Left) => "Yang_L",
            Metric::Group(ChannelGroup::Yang, Side::Right) => "Yang_R",
            Metric::Group(ChannelGroup::Hands, Side::Left) => "Hands_L",
            Metric::Group(ChannelGroup::Hands, Side::Right) => "Hands_R",
            Metric::Group(ChannelGroup::Feet, Side::Left) => "Feet_L",
            Metric::Group(ChannelGroup::Feet, Side::Right) => "Feet_R",
            Metric::Group(ChannelGroup::Inner, Side::Left) => "Inner_L",
            Metric::Group(ChannelGroup::Inner, Side::Right) => "Inner_R",
            Metric::Group(ChannelGroup::Outer, Side::Left) => "Outer_L",
            Metric::Group(ChannelGroup::Outer, Side::Right) => "Outer_R",
            Metric::MeanAll => "MeanAll",
            Metric::CorridorLower => "CorridorLower",
            Metric::CorridorUpper => "CorridorUpper",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::all()
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{Channel, Side};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    #[test]
    fn test_observation_set_get() {
        let mut obs = Observation::new(date());
        let code = PointCode::new(Channel::H1, Side::Left);
        assert!(obs.is_blank());

        obs.set(code, Some(150.0));
        assert_eq!(obs.get(code), Some(150.0));
        assert_eq!(obs.reading_count(), 1);

        obs.set(code, None);
        assert_eq!(obs.get(code), None);
        assert!(obs.is_blank());
    }

    #[test]
    fn test_observation_readings_canonical_order() {
        let mut obs = Observation::new(date());
        obs.set(PointCode::new(Channel::F6, Side::Right), Some(3.0));
        obs.set(PointCode::new(Channel::H1, Side::Left), Some(1.0));
        obs.set(PointCode::new(Channel::H1, Side::Right), Some(2.0));

        let codes: Vec<String> = obs.readings().map(|(c, _)| c.to_string()).collect();
        assert_eq!(codes, vec!["H1L", "H1R", "F6R"]);
    }

    #[test]
    fn test_metric_names_roundtrip() {
        for metric in Metric::all() {
            let parsed: Metric = metric.as_str().parse().unwrap();
            assert_eq!(parsed, metric);
        }
        assert!("Yin_X".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_value_render() {
        assert_eq!(MetricValue::Number(156.666).render(), "156.7");
        assert_eq!(MetricValue::Text("H1L".to_string()).render(), "H1L");
        assert_eq!(MetricValue::Missing.render(), "");
    }

    #[test]
    fn test_recommendation_mode_parse() {
        assert_eq!(
            "five_elements".parse::<RecommendationMode>().unwrap(),
            RecommendationMode::FiveElements
        );
        assert!("5_elements".parse::<RecommendationMode>().is_err());
    }
}
