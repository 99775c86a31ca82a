//! XLSX exporter: one worksheet, header row, one data row per record.

use crate::error::AeroscribeError;
use crate::output::ImageRecord;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Write `records` to an XLSX workbook at `path`.
pub fn write(records: &[ImageRecord], path: &Path) -> Result<(), AeroscribeError> {
    let export_err = |e: rust_xlsxwriter::XlsxError| AeroscribeError::ExportFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Descriptions").map_err(export_err)?;

    sheet.write_string(0, 0, super::HEADER[0]).map_err(export_err)?;
    sheet.write_string(0, 1, super::HEADER[1]).map_err(export_err)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet
            .write_string(row, 0, record.file_name())
            .map_err(export_err)?;
        sheet
            .write_string(row, 1, record.description_text())
            .map_err(export_err)?;
    }

    workbook.save(path).map_err(export_err)?;
    Ok(())
}
