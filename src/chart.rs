//! Chart-ready data preparation
//!
//! Pure data computation for the dashboard charts: per-channel bar rows,
//! corridor band classification, and the meridian network elements. Keeping
//! this separate from rendering lets front ends consume the same structures.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Channel, PointCode, Side, CHANNEL_ORDER};
use crate::types::{Corridor, Observation};

/// One bar-chart row: a channel with its left/right readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelBar {
    pub channel: Channel,
    /// Readable axis label, e.g. "H3 (Heart)"
    pub label: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl ChannelBar {
    pub fn code_left(&self) -> PointCode {
        PointCode::new(self.channel, Side::Left)
    }

    pub fn code_right(&self) -> PointCode {
        PointCode::new(self.channel, Side::Right)
    }
}

/// Bar rows for all 12 channels in display order
pub fn bar_rows(observation: &Observation) -> Vec<ChannelBar> {
    CHANNEL_ORDER
        .iter()
        .map(|&channel| ChannelBar {
            channel,
            label: channel.label(),
            left: observation.get(PointCode::new(channel, Side::Left)),
            right: observation.get(PointCode::new(channel, Side::Right)),
        })
        .collect()
}

/// Position of a value relative to the corridor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Safe,
    High,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Low => "low",
            Band::Safe => "safe",
            Band::High => "high",
        }
    }
}

/// Classify a value against the corridor; the bounds belong to the safe band
pub fn classify(value: f64, corridor: &Corridor) -> Band {
    if value > corridor.upper {
        Band::High
    } else if value < corridor.lower {
        Band::Low
    } else {
        Band::Safe
    }
}

/// Band of a channel: classifies the mean of its present left/right readings
pub fn channel_band(
    observation: &Observation,
    channel: Channel,
    corridor: &Corridor,
) -> Option<Band> {
    let values: Vec<f64> = [Side::Left, Side::Right]
        .into_iter()
        .filter_map(|side| observation.get(PointCode::new(channel, side)))
        .collect();
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(classify(mean, corridor))
}

/// Element of the meridian network view: channel nodes plus chain edges
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NetworkElement {
    Node {
        id: &'static str,
        label: String,
        band: Option<Band>,
    },
    Edge {
        source: &'static str,
        target: &'static str,
    },
}

/// Build the meridian network: one node per channel with its band class,
/// and edges chaining consecutive channels in display order.
pub fn network_elements(
    observation: &Observation,
    corridor: Option<&Corridor>,
) -> Vec<NetworkElement> {
    let mut elements: Vec<NetworkElement> = CHANNEL_ORDER
        .iter()
        .map(|&channel| NetworkElement::Node {
            id: channel.as_str(),
            label: channel.label(),
            band: corridor.and_then(|c| channel_band(observation, channel, c)),
        })
        .collect();

    for pair in CHANNEL_ORDER.windows(2) {
        elements.push(NetworkElement::Edge {
            source: pair[0].as_str(),
            target: pair[1].as_str(),
        });
    }

    elements
}
