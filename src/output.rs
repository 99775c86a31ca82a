//! Batch data model: records, formats, and run results.
//!
//! An [`ImageRecord`] is created once by the folder scan and mutated exactly
//! once by the batch coordinator, which attaches the description. Nothing
//! here outlives a single run; the only persistent artifact is the file an
//! exporter writes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One image in the batch: its location plus the description attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// File location, as produced by the folder scan. Never mutated after
    /// the scan.
    pub path: PathBuf,

    /// The backend's answer, the no-content fallback, or substituted error
    /// text. `None` only between the scan and the coordinator's pass.
    pub description: Option<String>,
}

impl ImageRecord {
    /// A freshly scanned record with no description yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            description: None,
        }
    }

    /// File base name, the form exporters print.
    ///
    /// Falls back to the full path display for paths without a final
    /// component (should not occur for scanned regular files).
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Description text for export. Always readable: the empty string when
    /// the coordinator has not run, so exporters never branch on absence.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The closed set of export document formats.
///
/// Determines which serializer runs and the default output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// One-sheet workbook (`.xlsx`).
    Spreadsheet,
    /// Comma-separated values with standard quoting (`.csv`).
    Csv,
    /// Two-line blocks of plain text (`.txt`).
    PlainText,
    /// Paginated A4 document with embedded thumbnails (`.pdf`).
    Pdf,
}

impl ExportFormat {
    /// Default file extension for this format, without the dot.
    pub fn default_extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::PlainText => "txt",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Apply the format's default extension when `path` has none.
    pub fn with_default_extension(self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.default_extension())
        }
    }
}

/// Timing and outcome counters for one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Records produced by the folder scan.
    pub total_images: usize,
    /// Records whose backend call returned text (including the fallback).
    pub described: usize,
    /// Records that carry substituted error text.
    pub failed: usize,
    /// Wall-clock time of the folder scan (including raster conversion).
    pub scan_duration_ms: u64,
    /// Wall-clock time of the sequential backend loop.
    pub describe_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Result of a batch run: the described records plus run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Records in scan order, each with its description attached.
    pub records: Vec<ImageRecord>,
    /// Counters and timings for the run.
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_directories() {
        let rec = ImageRecord::new("/data/flight7/a.jpg");
        assert_eq!(rec.file_name(), "a.jpg");
    }

    #[test]
    fn description_text_defaults_to_empty() {
        let rec = ImageRecord::new("a.jpg");
        assert_eq!(rec.description_text(), "");
    }

    #[test]
    fn description_text_returns_attached_text() {
        let mut rec = ImageRecord::new("a.jpg");
        rec.description = Some("A runway at dusk.".into());
        assert_eq!(rec.description_text(), "A runway at dusk.");
    }

    #[test]
    fn default_extensions() {
        assert_eq!(ExportFormat::Spreadsheet.default_extension(), "xlsx");
        assert_eq!(ExportFormat::Csv.default_extension(), "csv");
        assert_eq!(ExportFormat::PlainText.default_extension(), "txt");
        assert_eq!(ExportFormat::Pdf.default_extension(), "pdf");
    }

    #[test]
    fn with_default_extension_keeps_explicit_extension() {
        let p = ExportFormat::Pdf.with_default_extension(Path::new("out.report"));
        assert_eq!(p, PathBuf::from("out.report"));
        let p = ExportFormat::Csv.with_default_extension(Path::new("descriptions"));
        assert_eq!(p, PathBuf::from("descriptions.csv"));
    }

    #[test]
    fn batch_output_round_trips_through_json() {
        let out = BatchOutput {
            records: vec![ImageRecord {
                path: PathBuf::from("a.jpg"),
                description: Some("clouds".into()),
            }],
            stats: BatchStats {
                total_images: 1,
                described: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&out).expect("serialize");
        let back: BatchOutput = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.records.len(), 1);
        assert_eq!(back.records[0].description_text(), "clouds");
        assert_eq!(back.stats.described, 1);
    }
}
