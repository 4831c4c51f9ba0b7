//! Per-point metadata registry
//!
//! Titles, location notes and documentation links for the 24 measurement
//! points. The default registry generates placeholder entries; a deployment
//! can ship real location notes as markdown files next to the data.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::taxonomy::PointCode;

/// Metadata for one measurement point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMeta {
    pub code: PointCode,
    /// Readable title, e.g. "H1 Left"
    pub title: String,
    /// Short location note
    pub description: String,
    /// Path of the point's documentation file
    pub link: PathBuf,
}

/// Default metadata for all 24 points, keyed by point code.
///
/// `points_dir` is where per-point markdown notes are expected to live.
pub fn default_metadata(points_dir: &Path) -> BTreeMap<PointCode, PointMeta> {
    PointCode::all()
        .map(|code| {
            let meta = PointMeta {
                code,
                title: format!("{} {}", code.channel.as_str(), code.side.word()),
                description: "Point location is described in the linked note.".to_string(),
                link: points_dir.join(format!("{code}.md")),
            };
            (code, meta)
        })
        .collect()
}
