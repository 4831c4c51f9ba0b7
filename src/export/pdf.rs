//! Paginated text PDF report

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::AnalysisError;

use super::ReportRow;

const REPORT_TITLE: &str = "Riodoraku Metrics Report";
const PAGE_WIDTH: f32 = 210.0; // A4, millimetres
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_MARGIN: f32 = 15.0;
const TOP_MARGIN: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 18.0;

fn pdf_error<E: std::fmt::Display>(error: E) -> AnalysisError {
    AnalysisError::PdfError(error.to_string())
}

/// Serialize report rows as a simple paginated text PDF
pub fn write_pdf(rows: &[ReportRow]) -> Result<Vec<u8>, AnalysisError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "metrics");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - TOP_MARGIN;
    layer.use_text(REPORT_TITLE, 14.0, Mm(LEFT_MARGIN), Mm(y), &bold);
    y -= 10.0;

    for row in rows {
        if y < BOTTOM_MARGIN + 10.0 {
            (layer, y) = continuation_page(&doc, &bold);
        }
        layer.use_text(
            format!("Date: {}", row.date_string()),
            11.0,
            Mm(LEFT_MARGIN),
            Mm(y),
            &bold,
        );
        y -= 6.0;

        for (name, value) in &row.values {
            if y < BOTTOM_MARGIN {
                (layer, y) = continuation_page(&doc, &bold);
            }
            layer.use_text(
                format!("{name}: {}", value.render()),
                9.0,
                Mm(LEFT_MARGIN + 5.0),
                Mm(y),
                &regular,
            );
            y -= 4.5;
        }
        y -= 3.0;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn continuation_page(
    doc: &PdfDocumentReference,
    bold: &IndirectFontRef,
) -> (PdfLayerReference, f32) {
    let (page, layer_index) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "metrics");
    let layer = doc.get_page(page).get_layer(layer_index);
    let mut y = PAGE_HEIGHT - TOP_MARGIN;
    layer.use_text(
        format!("{REPORT_TITLE} (cont.)"),
        14.0,
        Mm(LEFT_MARGIN),
        Mm(y),
        bold,
    );
    y -= 10.0;
    (layer, y)
}
