//! Riodoraku Analytics - compute engine for paired electrodermal measurements
//!
//! The crate ingests CSV time series of skin-conductance readings taken at 12
//! meridian channels on both body sides and derives per-date aggregate
//! metrics: grouped means over the six group axes, the normal-range corridor,
//! and the two extreme points with corrective recommendations.
//!
//! ## Modules
//!
//! - **taxonomy / five_elements**: the fixed channel, group and lookup tables
//! - **metrics / analyzer**: the per-row computation core and dataset-level
//!   orchestration
//! - **loader**: CSV discovery, validation and parsing
//! - **chart / render**: chart-ready data and SVG rendering
//! - **export**: CSV, spreadsheet, PDF and JSON report writers

pub mod analyzer;
pub mod chart;
pub mod error;
pub mod export;
pub mod five_elements;
pub mod loader;
pub mod metadata;
pub mod metrics;
pub mod render;
pub mod taxonomy;
pub mod types;

pub use analyzer::Analyzer;
pub use error::AnalysisError;
pub use loader::{discover_csv_files, load_many, Dataset};
pub use metrics::{
    compute_corridor, compute_extremes, compute_row_metrics, DEFAULT_CORRIDOR_WIDTH,
};
pub use taxonomy::{Channel, ChannelGroup, PointCode, Side, CHANNEL_ORDER};
pub use types::{
    Action, Corridor, ExtremePoint, Metric, MetricValue, Observation, RecommendationMode,
    RowMetrics,
};

/// Engine version embedded in report payloads
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "riodoraku";
