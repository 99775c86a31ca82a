//! Plain-text exporter: a labelled block per record.

use crate::error::AeroscribeError;
use crate::output::ImageRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `records` as plain text blocks to `path`.
///
/// Each record becomes
/// ```text
/// Image File: {name}
/// Description:
/// {description}
/// ```
/// with a blank line after each block.
pub fn write(records: &[ImageRecord], path: &Path) -> Result<(), AeroscribeError> {
    let io_err = |source: std::io::Error| AeroscribeError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for record in records {
        writeln!(out, "Image File: {}", record.file_name()).map_err(io_err)?;
        writeln!(out, "Description:").map_err(io_err)?;
        writeln!(out, "{}", record.description_text()).map_err(io_err)?;
        writeln!(out).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    Ok(())
}
