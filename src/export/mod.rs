//! Document exporters for described image records.
//!
//! Four independent serializers share one input contract: an ordered slice
//! of [`ImageRecord`]s and an output path. No state survives between
//! exports: each call either writes the file or returns a fatal error.
//! Per-record problems (an image
//! the PDF writer cannot embed) are handled locally and never abort the
//! remaining records.
//!
//! | Format | Module | Writer crate |
//! |--------|--------|--------------|
//! | `.xlsx` | [`spreadsheet`] | rust_xlsxwriter |
//! | `.csv`  | [`csv`]  | csv |
//! | `.txt`  | [`text`] | std |
//! | `.pdf`  | [`pdf`]  | printpdf |

pub mod csv;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use crate::error::AeroscribeError;
use crate::output::{ExportFormat, ImageRecord};
use std::path::Path;
use tracing::info;

/// Column headers shared by the tabular exporters.
pub(crate) const HEADER: [&str; 2] = ["Image File", "Description"];

/// Serialize `records` to `path` in the chosen format.
pub fn export(
    records: &[ImageRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), AeroscribeError> {
    match format {
        ExportFormat::Spreadsheet => spreadsheet::write(records, path)?,
        ExportFormat::Csv => csv::write(records, path)?,
        ExportFormat::PlainText => text::write(records, path)?,
        ExportFormat::Pdf => pdf::write(records, path)?,
    }
    info!(
        "Exported {} record(s) to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
