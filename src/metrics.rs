//! Per-row metrics computation
//!
//! This is the computation core: grouped means over the six group axes,
//! the normal-range corridor, and the two extreme points with their
//! recommendations. Everything here is deterministic and side-effect-free;
//! absent readings propagate as absent and are never treated as zero.

use crate::five_elements::recommended_point;
use crate::taxonomy::{Channel, ChannelGroup, PointCode, Side, GROUP_ORDER};
use crate::types::{Action, Corridor, ExtremePoint, Observation, RecommendationMode, RowMetrics};

/// Default corridor half-width as a fraction of the overall mean
pub const DEFAULT_CORRIDOR_WIDTH: f64 = 0.10;

/// Mean reading over the given channels on one side, ignoring absent values.
///
/// Returns `None` when every reading of the subset is absent.
pub fn mean_for_side(observation: &Observation, channels: &[Channel], side: Side) -> Option<f64> {
    let values: Vec<f64> = channels
        .iter()
        .filter_map(|&channel| observation.get(PointCode::new(channel, side)))
        .collect();
    mean(&values)
}

/// Mean over all 24 point codes, ignoring absent values
pub fn overall_mean(observation: &Observation) -> Option<f64> {
    let values: Vec<f64> = observation.readings().map(|(_, v)| v).collect();
    mean(&values)
}

/// Corridor as `overall mean * (1 ∓ width)`
pub fn compute_corridor(observation: &Observation, width: f64) -> Option<Corridor> {
    overall_mean(observation).map(|mean_all| Corridor {
        mean_all,
        lower: mean_all * (1.0 - width),
        upper: mean_all * (1.0 + width),
    })
}

/// Find the maximum and minimum readings and build their recommendations.
///
/// The scan runs in canonical point order, so ties keep the first code
/// encountered. Returns `None` when the observation has no readings.
pub fn compute_extremes(
    observation: &Observation,
    mode: RecommendationMode,
) -> Option<(ExtremePoint, ExtremePoint)> {
    let mut max: Option<(PointCode, f64)> = None;
    let mut min: Option<(PointCode, f64)> = None;

    for (code, value) in observation.readings() {
        match max {
            Some((_, best)) if value <= best => {}
            _ => max = Some((code, value)),
        }
        match min {
            Some((_, best)) if value >= best => {}
            _ => min = Some((code, value)),
        }
    }

    let (max_code, max_value) = max?;
    let (min_code, min_value) = min?;

    Some((
        extreme_point(max_code, max_value, Action::Sedate, mode),
        extreme_point(min_code, min_value, Action::Tonify, mode),
    ))
}

fn extreme_point(code: PointCode, value: f64, action: Action, mode: RecommendationMode) -> ExtremePoint {
    let recommend_point = match mode {
        RecommendationMode::Simple => None,
        RecommendationMode::FiveElements => {
            Some(recommended_point(code.channel, action).to_string())
        }
    };
    ExtremePoint {
        code,
        value,
        meridian: code.channel.meridian().to_string(),
        action,
        recommend_point,
    }
}

/// Compute all per-row metrics with the default corridor width
pub fn compute_row_metrics(observation: &Observation, mode: RecommendationMode) -> RowMetrics {
    compute_row_metrics_with_width(observation, mode, DEFAULT_CORRIDOR_WIDTH)
}

/// Compute all per-row metrics: 12 grouped means, corridor, extremes
pub fn compute_row_metrics_with_width(
    observation: &Observation,
    mode: RecommendationMode,
    corridor_width: f64,
) -> RowMetrics {
    let mut means: [[Option<f64>; 2]; 6] = [[None; 2]; 6];
    for (gi, group) in GROUP_ORDER.iter().enumerate() {
        for (si, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            means[gi][si] = mean_for_side(observation, &group.channels(), side);
        }
    }

    let corridor = compute_corridor(observation, corridor_width);
    let extremes = compute_extremes(observation, mode);
    let (max_point, min_point) = match extremes {
        Some((max, min)) => (Some(max), Some(min)),
        None => (None, None),
    };

    let mean_of = |group: ChannelGroup, si: usize| {
        let gi = GROUP_ORDER.iter().position(|g| *g == group).unwrap_or(0);
        means[gi][si]
    };

    RowMetrics {
        yin_left: mean_of(ChannelGroup::Yin, 0),
        yin_right: mean_of(ChannelGroup::Yin, 1),
        yang_left: mean_of(ChannelGroup::Yang, 0),
        yang_right: mean_of(ChannelGroup::Yang, 1),
        hands_left: mean_of(ChannelGroup::Hands, 0),
        hands_right: mean_of(ChannelGroup::Hands, 1),
        feet_left: mean_of(ChannelGroup::Feet, 0),
        feet_right: mean_of(ChannelGroup::Feet, 1),
        inner_left: mean_of(ChannelGroup::Inner, 0),
        inner_right: mean_of(ChannelGroup::Inner, 1),
        outer_left: mean_of(ChannelGroup::Outer, 0),
        outer_right: mean_of(ChannelGroup::Outer, 1),
        corridor,
        max_point,
        min_point,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const EPS: f64 = 1e-9;

    /// Full 24-reading fixture with a single maximum run starting at H1L
    /// and a single minimum run starting at H4R.
    fn full_observation() -> Observation {
        let readings = [
            ("H1L", 160.0),
            ("H2L", 150.0),
            ("H3L", 160.0),
            ("H4L", 130.0),
            ("H5L", 150.0),
            ("H6L", 160.0),
            ("H1R", 150.0),
            ("H2R", 140.0),
            ("H3R", 140.0),
            ("H4R", 125.0),
            ("H5R", 145.0),
            ("H6R", 150.0),
            ("F1L", 150.0),
            ("F2L", 160.0),
            ("F3L", 160.0),
            ("F4L", 135.0),
            ("F5L", 145.0),
            ("F6L", 150.0),
            ("F1R", 125.0),
            ("F2R", 155.0),
            ("F3R", 160.0),
            ("F4R", 135.0),
            ("F5R", 150.0),
            ("F6R", 160.0),
        ];
        Observation::with_readings(
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            readings
                .into_iter()
                .map(|(code, value)| (PointCode::from_str(code).unwrap(), value)),
        )
    }

    #[test]
    fn test_grouped_means() {
        let obs = full_observation();
        let metrics = compute_row_metrics(&obs, RecommendationMode::Simple);

        assert!((metrics.yin_left.unwrap() - 940.0 / 6.0).abs() < EPS);
        assert!((metrics.yin_right.unwrap() - 145.0).abs() < EPS);
        assert!((metrics.yang_left.unwrap() - 145.0).abs() < EPS);
        assert!((metrics.yang_right.unwrap() - 865.0 / 6.0).abs() < EPS);
        assert!((metrics.hands_left.unwrap() - 910.0 / 6.0).abs() < EPS);
        assert!((metrics.hands_right.unwrap() - 850.0 / 6.0).abs() < EPS);
        assert!((metrics.feet_left.unwrap() - 150.0).abs() < EPS);
        assert!((metrics.feet_right.unwrap() - 147.5).abs() < EPS);
        // Yin and Inner cover the same channel set, in different order
        assert_eq!(metrics.inner_left, metrics.yin_left);
        assert_eq!(metrics.outer_right, metrics.yang_right);
    }

    #[test]
    fn test_corridor_bounds() {
        let obs = full_observation();
        let corridor = compute_corridor(&obs, DEFAULT_CORRIDOR_WIDTH).unwrap();

        let expected_mean = 3545.0 / 24.0;
        assert!((corridor.mean_all - expected_mean).abs() < EPS);
        assert!((corridor.lower - expected_mean * 0.9).abs() < EPS);
        assert!((corridor.upper - expected_mean * 1.1).abs() < EPS);
    }

    #[test]
    fn test_extremes_first_code_wins_on_ties() {
        let obs = full_observation();
        // 160.0 occurs at H1L, H3L, H6L, F2L, F3L, F3R, F6R; 125.0 at H4R, F1R
        let (max, min) = compute_extremes(&obs, RecommendationMode::Simple).unwrap();

        assert_eq!(max.code.to_string(), "H1L");
        assert_eq!(max.value, 160.0);
        assert_eq!(max.meridian, "Lungs");
        assert_eq!(max.action, Action::Sedate);
        assert_eq!(max.recommend_point, None);

        assert_eq!(min.code.to_string(), "H4R");
        assert_eq!(min.value, 125.0);
        assert_eq!(min.meridian, "Small Intestine");
        assert_eq!(min.action, Action::Tonify);
        assert_eq!(min.recommend_point, None);
    }

    #[test]
    fn test_five_element_recommendations() {
        let obs = full_observation();
        let (max, min) = compute_extremes(&obs, RecommendationMode::FiveElements).unwrap();

        // Sedation point of the Lungs meridian, tonification point of Small Intestine
        assert_eq!(max.recommend_point.as_deref(), Some("LU5"));
        assert_eq!(min.recommend_point.as_deref(), Some("SI3"));
    }

    #[test]
    fn test_missing_values_excluded_from_means() {
        let mut obs = Observation::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        obs.set(PointCode::from_str("H1L").unwrap(), Some(100.0));
        obs.set(PointCode::from_str("H3L").unwrap(), Some(140.0));

        let metrics = compute_row_metrics(&obs, RecommendationMode::Simple);
        assert!((metrics.yin_left.unwrap() - 120.0).abs() < EPS);
        assert!((metrics.hands_left.unwrap() - 120.0).abs() < EPS);
        assert_eq!(metrics.yin_right, None);
        assert_eq!(metrics.feet_left, None);
        assert!((metrics.corridor.unwrap().mean_all - 120.0).abs() < EPS);
    }

    #[test]
    fn test_blank_observation_propagates_absence() {
        let obs = Observation::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        let metrics = compute_row_metrics(&obs, RecommendationMode::FiveElements);

        assert_eq!(metrics.yin_left, None);
        assert_eq!(metrics.corridor, None);
        assert_eq!(metrics.max_point, None);
        assert_eq!(metrics.min_point, None);
    }

    #[test]
    fn test_single_reading_is_both_extremes() {
        let mut obs = Observation::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        obs.set(PointCode::from_str("F5R").unwrap(), Some(88.0));

        let (max, min) = compute_extremes(&obs, RecommendationMode::Simple).unwrap();
        assert_eq!(max.code, min.code);
        assert_eq!(max.value, 88.0);
        assert_eq!(max.action, Action::Sedate);
        assert_eq!(min.action, Action::Tonify);
    }

    #[test]
    fn test_to_pairs_layout() {
        let obs = full_observation();
        let metrics = compute_row_metrics(&obs, RecommendationMode::FiveElements);
        let pairs = metrics.to_pairs();

        assert_eq!(pairs.len(), 25);
        let names: Vec<&str> = pairs.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
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
            ]
        );
        let max_code = pairs
            .iter()
            .find(|(name, _)| *name == "MaxCode")
            .map(|(_, value)| value.render())
            .unwrap();
        assert_eq!(max_code, "H1L");
    }

    #[test]
    fn test_custom_corridor_width() {
        let obs = full_observation();
        let corridor = compute_corridor(&obs, 0.25).unwrap();
        let expected_mean = 3545.0 / 24.0;
        assert!((corridor.lower - expected_mean * 0.75).abs() < EPS);
        assert!((corridor.upper - expected_mean * 1.25).abs() < EPS);
    }
}
