//! Channel and point-code taxonomy
//!
//! Riodoraku measurements are taken at 12 channels (six hand meridians H1-H6,
//! six foot meridians F1-F6), each on the left and right side of the body.
//! This module defines the channel set, the 24 point codes, and the fixed
//! group axes the aggregate metrics are computed over.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Measurement channel (meridian location without side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
}

/// Channels in display order (hands first, then feet)
pub const CHANNEL_ORDER: [Channel; 12] = [
    Channel::H1,
    Channel::H2,
    Channel::H3,
    Channel::H4,
    Channel::H5,
    Channel::H6,
    Channel::F1,
    Channel::F2,
    Channel::F3,
    Channel::F4,
    Channel::F5,
    Channel::F6,
];

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::H1 => "H1",
            Channel::H2 => "H2",
            Channel::H3 => "H3",
            Channel::H4 => "H4",
            Channel::H5 => "H5",
            Channel::H6 => "H6",
            Channel::F1 => "F1",
            Channel::F2 => "F2",
            Channel::F3 => "F3",
            Channel::F4 => "F4",
            Channel::F5 => "F5",
            Channel::F6 => "F6",
        }
    }

    /// Meridian name associated with the channel
    pub fn meridian(&self) -> &'static str {
        match self {
            Channel::H1 => "Lungs",
            Channel::H2 => "Pericardium",
            Channel::H3 => "Heart",
            Channel::H4 => "Small Intestine",
            Channel::H5 => "Triple Heater",
            Channel::H6 => "Large Intestine",
            Channel::F1 => "Spleen/Pancreas",
            Channel::F2 => "Liver",
            Channel::F3 => "Kidneys",
            Channel::F4 => "Urinary Bladder",
            Channel::F5 => "Gallbladder",
            Channel::F6 => "Stomach",
        }
    }

    /// Readable label for chart axes, e.g. "H1 (Lungs)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.as_str(), self.meridian())
    }

    /// Position in [`CHANNEL_ORDER`]
    pub fn index(&self) -> usize {
        CHANNEL_ORDER.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHANNEL_ORDER
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownPointCode(s.to_string()))
    }
}

/// Body side of a measurement point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "L",
            Side::Right => "R",
        }
    }

    pub fn word(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Fully qualified measurement point: channel plus side, e.g. `H1L`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointCode {
    pub channel: Channel,
    pub side: Side,
}

impl PointCode {
    pub fn new(channel: Channel, side: Side) -> Self {
        Self { channel, side }
    }

    /// All 24 point codes in canonical order (`H1L, H1R, H2L, ... F6R`).
    ///
    /// Canonical order is also the tie-breaking order for extremum selection.
    pub fn all() -> impl Iterator<Item = PointCode> {
        CHANNEL_ORDER.iter().flat_map(|&channel| {
            [Side::Left, Side::Right]
                .into_iter()
                .map(move |side| PointCode { channel, side })
        })
    }
}

impl fmt::Display for PointCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.channel.as_str(), self.side.as_str())
    }
}

impl FromStr for PointCode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() < 2 || !s.is_ascii() {
            return Err(AnalysisError::UnknownPointCode(s.to_string()));
        }
        let (channel_part, side_part) = s.split_at(s.len() - 1);
        let channel = Channel::from_str(channel_part)
            .map_err(|_| AnalysisError::UnknownPointCode(s.to_string()))?;
        let side = match side_part {
            "L" => Side::Left,
            "R" => Side::Right,
            _ => return Err(AnalysisError::UnknownPointCode(s.to_string())),
        };
        Ok(PointCode { channel, side })
    }
}

impl Serialize for PointCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PointCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PointCode::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Group axis used for the paired aggregate means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelGroup {
    Yin,
    Yang,
    Hands,
    Feet,
    Inner,
    Outer,
}

/// Group axes in metric output order
pub const GROUP_ORDER: [ChannelGroup; 6] = [
    ChannelGroup::Yin,
    ChannelGroup::Yang,
    ChannelGroup::Hands,
    ChannelGroup::Feet,
    ChannelGroup::Inner,
    ChannelGroup::Outer,
];

impl ChannelGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelGroup::Yin => "Yin",
            ChannelGroup::Yang => "Yang",
            ChannelGroup::Hands => "Hands",
            ChannelGroup::Feet => "Feet",
            ChannelGroup::Inner => "Inner",
            ChannelGroup::Outer => "Outer",
        }
    }

    /// Channel set of the group, six channels each
    pub fn channels(&self) -> [Channel; 6] {
        match self {
            ChannelGroup::Yin => [
                Channel::H1,
                Channel::F1,
                Channel::H3,
                Channel::F3,
                Channel::H2,
                Channel::F2,
            ],
            ChannelGroup::Yang => [
                Channel::H6,
                Channel::F6,
                Channel::H4,
                Channel::F4,
                Channel::H5,
                Channel::F5,
            ],
            ChannelGroup::Hands => [
                Channel::H1,
                Channel::H2,
                Channel::H3,
                Channel::H4,
                Channel::H5,
                Channel::H6,
            ],
            ChannelGroup::Feet => [
                Channel::F1,
                Channel::F2,
                Channel::F3,
                Channel::F4,
                Channel::F5,
                Channel::F6,
            ],
            ChannelGroup::Inner => [
                Channel::H1,
                Channel::H2,
                Channel::H3,
                Channel::F1,
                Channel::F2,
                Channel::F3,
            ],
            ChannelGroup::Outer => [
                Channel::H4,
                Channel::H5,
                Channel::H6,
                Channel::F4,
                Channel::F5,
                Channel::F6,
            ],
        }
    }
}
