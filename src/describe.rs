//! Batch coordinator: scan, describe each image, collect results.
//!
//! [`describe_folder`] is the library's main entry point. It scans the
//! folder, then walks the records strictly sequentially: one backend call
//! at a time, in scan order. Sequential on purpose: a local vision model
//! saturates the machine with a single request, and interleaving requests
//! makes per-image timing useless for diagnosing slow models.
//!
//! A failed backend call never stops the batch. The failure is folded into
//! the record as substituted error text (see [`crate::prompts`]) and the
//! loop moves on, so every scanned image ends the run with a description
//! string of some kind.

use crate::backend::{DescriptionBackend, OllamaBackend};
use crate::config::BatchConfig;
use crate::error::AeroscribeError;
use crate::export;
use crate::output::{BatchOutput, BatchStats, ExportFormat};
use crate::prompts;
use crate::scan::scan_folder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Scan `folder` and describe every image in it.
///
/// Returns one record per scanned image, each carrying either the backend's
/// text, the no-content fallback, or substituted error text. Fails only on
/// input, raster, or configuration problems; backend failures are folded
/// into the affected record.
///
/// # Example
/// ```rust,no_run
/// use aeroscribe::{describe_folder, BatchConfig};
///
/// # async fn run() -> Result<(), aeroscribe::AeroscribeError> {
/// let config = BatchConfig::default();
/// let output = describe_folder(std::path::Path::new("./flight7"), &config).await?;
/// for record in &output.records {
///     println!("{}: {}", record.file_name(), record.description_text());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn describe_folder(
    folder: &Path,
    config: &BatchConfig,
) -> Result<BatchOutput, AeroscribeError> {
    let run_start = Instant::now();

    let scan_start = Instant::now();
    let mut records = scan_folder(folder, config.convert_rasters)?;
    let scan_duration = scan_start.elapsed();
    info!(
        "Scanned {}: {} image(s) in {:?}",
        folder.display(),
        records.len(),
        scan_duration
    );

    let backend = resolve_backend(config)?;
    let total = records.len();
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_start(total);
    }

    let describe_start = Instant::now();
    let mut described = 0usize;
    let mut failed = 0usize;

    for (index, record) in records.iter_mut().enumerate() {
        let file_name = record.file_name();
        if let Some(cb) = &config.progress_callback {
            cb.on_image_start(index, total, &file_name);
        }

        let image_start = Instant::now();
        match backend.describe(&record.path, &config.prompt).await {
            Ok(text) => {
                debug!(
                    "Described {} ({} chars) in {:?}",
                    file_name,
                    text.len(),
                    image_start.elapsed()
                );
                if let Some(cb) = &config.progress_callback {
                    cb.on_image_complete(index, total, &file_name, text.len());
                }
                record.description = Some(text);
                described += 1;
            }
            Err(err) => {
                warn!("Describing {} failed: {}", file_name, err);
                let text = prompts::error_description(&err);
                if let Some(cb) = &config.progress_callback {
                    cb.on_image_error(index, total, &file_name, text.clone());
                }
                record.description = Some(text);
                failed += 1;
            }
        }
    }

    let describe_duration = describe_start.elapsed();
    if let Some(cb) = &config.progress_callback {
        cb.on_batch_complete(total, described);
    }
    info!(
        "Batch complete: {}/{} described, {} failed, in {:?}",
        described, total, failed, describe_duration
    );

    Ok(BatchOutput {
        records,
        stats: BatchStats {
            total_images: total,
            described,
            failed,
            scan_duration_ms: scan_duration.as_millis() as u64,
            describe_duration_ms: describe_duration.as_millis() as u64,
            total_duration_ms: run_start.elapsed().as_millis() as u64,
        },
    })
}

/// Describe `folder` and export the records to `output_path` in `format`.
///
/// When `output_path` has no extension the format's default is appended.
/// Returns the batch output alongside writing the file, so callers can
/// inspect the stats of a run they also exported.
pub async fn describe_to_file(
    folder: &Path,
    format: ExportFormat,
    output_path: &Path,
    config: &BatchConfig,
) -> Result<(BatchOutput, PathBuf), AeroscribeError> {
    let output = describe_folder(folder, config).await?;
    let path = format.with_default_extension(output_path);
    export::export(&output.records, format, &path)?;
    Ok((output, path))
}

/// Blocking wrapper around [`describe_folder`] for synchronous callers.
///
/// Must not be called from within an async runtime.
pub fn describe_folder_sync(
    folder: &Path,
    config: &BatchConfig,
) -> Result<BatchOutput, AeroscribeError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AeroscribeError::Internal(format!("failed to start runtime: {e}")))?;
    runtime.block_on(describe_folder(folder, config))
}

/// Describe a single image with an explicit backend.
///
/// Applies the same failure policy as the batch loop: `Ok` always carries
/// usable description text, substituting error text when the call fails.
pub async fn describe_image(
    backend: &dyn DescriptionBackend,
    image_path: &Path,
    prompt: &str,
) -> String {
    match backend.describe(image_path, prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!("Describing {} failed: {}", image_path.display(), err);
            prompts::error_description(&err)
        }
    }
}

/// The backend a run will use: the injected one, or a fresh Ollama client
/// from the config's host, model and timeout.
fn resolve_backend(config: &BatchConfig) -> Result<Arc<dyn DescriptionBackend>, AeroscribeError> {
    if let Some(backend) = &config.backend {
        return Ok(Arc::clone(backend));
    }
    let backend = OllamaBackend::new(
        config.resolved_host(),
        config.model.clone(),
        Duration::from_secs(config.api_timeout_secs),
    )
    .map_err(|e| AeroscribeError::Internal(format!("failed to build HTTP client: {e}")))?;
    Ok(Arc::new(backend))
}
