//! Spreadsheet metrics export

use rust_xlsxwriter::Workbook;

use crate::error::AnalysisError;
use crate::types::MetricValue;

use super::{round1, ReportRow, DATE_COLUMN, METRIC_COLUMNS};

/// Serialize report rows as an xlsx workbook with a single `Metrics` sheet
pub fn write_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>, AnalysisError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Metrics")?;

    worksheet.write_string(0, 0, DATE_COLUMN)?;
    for (index, name) in METRIC_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, (index + 1) as u16, *name)?;
    }

    for (row_index, row) in rows.iter().enumerate() {
        let row_index = (row_index + 1) as u32;
        worksheet.write_string(row_index, 0, row.date_string())?;
        for (column_index, (_, value)) in row.values.iter().enumerate() {
            let column_index = (column_index + 1) as u16;
            match value {
                MetricValue::Number(v) => {
                    worksheet.write_number(row_index, column_index, round1(*v))?;
                }
                MetricValue::Text(text) if !text.is_empty() => {
                    worksheet.write_string(row_index, column_index, text)?;
                }
                _ => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_rows;
    use super::*;

    #[test]
    fn test_workbook_bytes() {
        let bytes = write_xlsx(&sample_rows()).unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_rows_still_produce_a_workbook() {
        let bytes = write_xlsx(&[]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
