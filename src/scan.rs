//! Folder scan: turn a directory of files into [`ImageRecord`]s.
//!
//! The scan is deliberately shallow: top-level regular files only, in
//! whatever order the filesystem enumerates them. Order is not sorted and
//! callers must not rely on it being stable between runs.

use crate::error::AeroscribeError;
use crate::output::ImageRecord;
use crate::raster;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scan `folder` into one record per regular file.
///
/// Fails before any backend work when the path is missing or not a
/// directory. With `convert_rasters`, `.tif`/`.tiff` files are first
/// converted to a sibling PNG (see [`crate::raster`]) and the record points
/// at the PNG; a converted PNG that is also a directory entry of its own
/// yields a single record, not two.
pub fn scan_folder(
    folder: &Path,
    convert_rasters: bool,
) -> Result<Vec<ImageRecord>, AeroscribeError> {
    if !folder.exists() {
        return Err(AeroscribeError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }
    if !folder.is_dir() {
        return Err(AeroscribeError::NotAFolder {
            path: folder.to_path_buf(),
        });
    }

    let read_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            AeroscribeError::PermissionDenied {
                path: folder.to_path_buf(),
            }
        } else {
            AeroscribeError::FolderReadFailed {
                path: folder.to_path_buf(),
                source,
            }
        }
    };

    let mut records = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for entry in std::fs::read_dir(folder).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_type = entry.file_type().map_err(read_err)?;
        if !file_type.is_file() {
            debug!("Skipping non-file entry {}", entry.path().display());
            continue;
        }

        let path = entry.path();
        let record_path = if convert_rasters && raster::is_scientific_raster(&path) {
            raster::convert_raster(&path)?
        } else {
            path
        };

        if seen.insert(record_path.clone()) {
            records.push(ImageRecord::new(record_path));
        }
    }

    debug!("Scanned {}: {} records", folder.display(), records.len());
    Ok(records)
}
