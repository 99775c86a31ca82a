//! CSV exporter: header row plus one quoted row per record.

use crate::error::AeroscribeError;
use crate::output::ImageRecord;
use std::path::Path;

/// Write `records` to a CSV file at `path`.
///
/// Standard quoting applies, so descriptions containing commas or newlines
/// round-trip through any conforming CSV reader.
pub fn write(records: &[ImageRecord], path: &Path) -> Result<(), AeroscribeError> {
    let export_err = |e: csv::Error| AeroscribeError::ExportFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(export_err)?;
    writer.write_record(super::HEADER).map_err(export_err)?;
    for record in records {
        let name = record.file_name();
        writer
            .write_record([name.as_str(), record.description_text()])
            .map_err(export_err)?;
    }
    writer
        .flush()
        .map_err(|source| AeroscribeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}
