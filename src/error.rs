//! Error types for the aeroscribe library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AeroscribeError`] is **fatal**: the run cannot proceed at all (the
//!   folder does not exist, a scientific raster cannot be decoded, the
//!   exported file cannot be written). Returned as `Err(AeroscribeError)`
//!   from the top-level `describe*` and `export` functions.
//!
//! * [`crate::backend::BackendError`] is **non-fatal**: a single backend call
//!   failed (daemon unreachable, model not loaded, unreadable image). The
//!   batch coordinator converts it into the record's description text and
//!   moves on; callers of the library never see it as an `Err`.
//!
//! The separation encodes the batch policy directly in the types: anything
//! that is `AeroscribeError` stops the run, anything that is `BackendError`
//! cannot.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the aeroscribe library.
///
/// Per-image backend failures use [`crate::backend::BackendError`] and are
/// folded into the record's description text rather than propagated here.
#[derive(Debug, Error)]
pub enum AeroscribeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The image folder was not found at the given path.
    #[error("Image folder not found: '{path}'\nCheck the path exists and is readable.")]
    FolderNotFound { path: PathBuf },

    /// The given path exists but is not a directory.
    #[error("'{path}' is not a folder")]
    NotAFolder { path: PathBuf },

    /// Process does not have read permission on the folder.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Listing the folder failed for a reason other than the above.
    #[error("Failed to list folder '{path}': {source}")]
    FolderReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Raster conversion errors ──────────────────────────────────────────
    /// A scientific raster file could not be decoded into RGB bands.
    #[error("Failed to decode raster '{path}': {detail}")]
    RasterDecodeFailed { path: PathBuf, detail: String },

    /// The converted RGB image could not be written next to the original.
    #[error("Failed to write converted image '{path}': {detail}")]
    RasterWriteFailed { path: PathBuf, detail: String },

    // ── Export errors ─────────────────────────────────────────────────────
    /// A document writer (xlsx/csv/pdf) reported an unrecoverable error.
    #[error("Failed to export '{path}': {detail}")]
    ExportFailed { path: PathBuf, detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
