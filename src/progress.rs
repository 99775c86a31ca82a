//! Progress-callback trait for per-image batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive an
//! event for every image as the coordinator works through the folder.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a GUI widget, or a log
//! file without the library knowing anything about how the host application
//! communicates. The batch itself is strictly sequential, but the trait is
//! still `Send + Sync` so the same callback object can be shared with other
//! tasks (e.g. a UI refresh loop) while the batch runs.

use std::sync::Arc;

/// Called by the batch coordinator as it processes each image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in order; the coordinator never
/// processes two images at once.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the folder scan, before the first backend call.
    fn on_batch_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called just before the backend request is sent for an image.
    ///
    /// `index` is 0-based position in the batch.
    fn on_image_start(&self, index: usize, total_images: usize, file_name: &str) {
        let _ = (index, total_images, file_name);
    }

    /// Called when an image was described successfully (including the
    /// no-content fallback text, since the call itself succeeded).
    fn on_image_complete(
        &self,
        index: usize,
        total_images: usize,
        file_name: &str,
        description_len: usize,
    ) {
        let _ = (index, total_images, file_name, description_len);
    }

    /// Called when the backend call failed and error text was substituted.
    ///
    /// `error` is the exact text written into the record's description.
    /// Owned `String` so the callback can be moved into spawned tasks.
    fn on_image_error(&self, index: usize, total_images: usize, file_name: &str, error: String) {
        let _ = (index, total_images, file_name, error);
    }

    /// Called once after every image has been attempted.
    fn on_batch_complete(&self, total_images: usize, described: usize) {
        let _ = (total_images, described);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
