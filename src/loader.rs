//! CSV ingestion
//!
//! Loads measurement CSV files into [`Observation`] rows. A file must carry a
//! `Date` column plus all 24 point-code columns; files failing validation are
//! skipped with a warning while the rest of the batch proceeds. Individual
//! unreadable reading cells become absent values, never errors.

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::AnalysisError;
use crate::types::Observation;
use crate::taxonomy::PointCode;

/// Accepted date formats, day-first preferred, time suffixes dropped
const DATE_FORMATS: [&str; 4] = ["%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// List the CSV files of a directory, sorted by name.
///
/// A missing directory yields an empty list rather than an error.
pub fn discover_csv_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    files.sort();
    files
}

/// Parse one CSV file into observations
pub fn load_file(path: &Path) -> Result<Vec<Observation>, AnalysisError> {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = File::open(path)?;
    parse_reader(file, &source)
}

/// Parse CSV content from any reader.
///
/// `source` names the origin (usually the file name) for provenance and
/// error messages.
pub fn parse_reader<R: Read>(reader: R, source: &str) -> Result<Vec<Observation>, AnalysisError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name, index))
        .collect();

    let date_column = columns.get("Date").copied();
    let point_columns: Vec<(PointCode, Option<usize>)> = PointCode::all()
        .map(|code| (code, columns.get(code.to_string().as_str()).copied()))
        .collect();

    let mut missing: Vec<String> = point_columns
        .iter()
        .filter(|(_, index)| index.is_none())
        .map(|(code, _)| code.to_string())
        .collect();
    if date_column.is_none() {
        missing.insert(0, "Date".to_string());
    }
    if !missing.is_empty() {
        return Err(AnalysisError::MissingColumns {
            file: source.to_string(),
            columns: missing,
        });
    }
    let date_column = date_column.unwrap_or(0);

    let mut observations = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let date_value = record.get(date_column).unwrap_or("");
        let date = parse_date(date_value).ok_or_else(|| AnalysisError::DateParse {
            file: source.to_string(),
            value: date_value.to_string(),
        })?;

        let mut observation = Observation::new(date);
        observation.source_file = Some(source.to_string());
        for (code, index) in &point_columns {
            let value = index
                .and_then(|i| record.get(i))
                .and_then(|cell| cell.parse::<f64>().ok());
            observation.set(*code, value);
        }

        // Rows with no readings at all carry no information
        if !observation.is_blank() {
            observations.push(observation);
        }
    }

    Ok(observations)
}

/// Lenient date parsing: day-first formats first, then ISO; any time-of-day
/// suffix after a space or `T` is dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .trim()
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or("");
    if date_part.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Load several files into one dataset, skipping files that fail to parse
pub fn load_many(paths: &[PathBuf]) -> Dataset {
    let mut observations = Vec::new();
    for path in paths {
        match load_file(path) {
            Ok(mut rows) => observations.append(&mut rows),
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping measurement file");
            }
        }
    }
    Dataset::from_observations(observations)
}

/// Observations ordered by date, with date-level access helpers
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Build a dataset, sorting observations by date (input order preserved
    /// within a date)
    pub fn from_observations(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|observation| observation.date);
        Self { observations }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Observations in date-ascending order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct observation dates, most recent first
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .observations
            .iter()
            .map(|observation| observation.date)
            .collect();
        dates.sort();
        dates.dedup();
        dates.reverse();
        dates
    }

    /// The observation for a date; the first in input order when the date
    /// occurs more than once
    pub fn observation_for_date(&self, date: NaiveDate) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|observation| observation.date == date)
    }

    /// The most recent observation
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }
}
