//! # aeroscribe
//!
//! Batch image description via a local vision-language model.
//!
//! aeroscribe points a local Ollama daemon at a folder of aerial
//! photographs, asks the model to describe each one, and exports the
//! `(file name, description)` pairs as a spreadsheet, CSV file, plain-text
//! report, or paginated PDF.
//!
//! ## Pipeline
//!
//! 1. **Scan** ([`scan_folder`]): enumerate the top-level files of the
//!    folder, converting scientific rasters (`.tif`/`.tiff`) to PNG first.
//! 2. **Describe** ([`describe_folder`]): send each image with the prompt
//!    to the [`DescriptionBackend`], strictly one at a time. A failed call
//!    substitutes error text into the record and the batch continues.
//! 3. **Export** ([`export::export`]): serialize the records in one of the
//!    four [`ExportFormat`]s.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use aeroscribe::{describe_to_file, BatchConfig, ExportFormat};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), aeroscribe::AeroscribeError> {
//! let config = BatchConfig::builder()
//!     .model("llama3.2-vision")
//!     .build()?;
//!
//! let (output, written) = describe_to_file(
//!     Path::new("./flight7"),
//!     ExportFormat::Csv,
//!     Path::new("descriptions.csv"),
//!     &config,
//! )
//! .await?;
//!
//! println!(
//!     "{}/{} described, written to {}",
//!     output.stats.described,
//!     output.stats.total_images,
//!     written.display()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Error model
//!
//! Fatal problems (missing folder, undecodable raster, unwritable output)
//! return [`AeroscribeError`]. Per-image backend failures are
//! [`BackendError`]s internally but never surface as `Err`: the coordinator
//! writes `Error generating description: <cause>` into the record instead,
//! so an export always contains one row per scanned image.

pub mod backend;
pub mod config;
pub mod describe;
pub mod error;
pub mod export;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod raster;
pub mod scan;

pub use backend::{BackendError, DescriptionBackend, OllamaBackend};
pub use config::{BatchConfig, BatchConfigBuilder, DEFAULT_HOST, DEFAULT_MODEL};
pub use describe::{describe_folder, describe_folder_sync, describe_image, describe_to_file};
pub use error::AeroscribeError;
pub use output::{BatchOutput, BatchStats, ExportFormat, ImageRecord};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use prompts::{DEFAULT_PROMPT, ERROR_PREFIX, NO_DESCRIPTION_FALLBACK};
pub use scan::scan_folder;
