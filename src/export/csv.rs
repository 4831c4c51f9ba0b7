//! CSV metrics export

use crate::error::AnalysisError;

use super::{ReportRow, DATE_COLUMN, METRIC_COLUMNS};

/// Serialize report rows as CSV bytes (header plus one record per date)
pub fn write_csv(rows: &[ReportRow]) -> Result<Vec<u8>, AnalysisError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = vec![DATE_COLUMN];
    header.extend(METRIC_COLUMNS);
    writer.write_record(&header)?;

    for row in rows {
        let mut record: Vec<String> = Vec::with_capacity(1 + row.values.len());
        record.push(row.date_string());
        record.extend(row.values.iter().map(|(_, value)| value.render()));
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|error| AnalysisError::ExportError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_rows;
    use super::*;

    #[test]
    fn test_csv_layout() {
        let bytes = write_csv(&sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date,Yin_L,Yin_R"));
        assert!(lines[0].ends_with("MinAction,MinRecommendPoint"));

        // Day one: H1L=156.66 rounds to 156.7, H4R=120.0 is the minimum
        let day1: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(day1[0], "2024-03-10");
        assert_eq!(day1[1], "156.7"); // Yin_L
        assert_eq!(day1[2], ""); // Yin_R has no readings
        assert_eq!(day1[16], "H1L"); // MaxCode
        assert_eq!(day1[21], "H4R"); // MinCode
        assert_eq!(day1[25], "SI3"); // MinRecommendPoint, five-element mode
    }

    #[test]
    fn test_empty_rows_yield_header_only() {
        let bytes = write_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
