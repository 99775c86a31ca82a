//! Configuration for a batch description run.
//!
//! All behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config between the CLI and library callers and to diff two
//! runs to understand why their outputs differ.
//!
//! The model name and the prompt are explicit configuration rather than
//! defaults baked into call sites, so the backend client stays testable with
//! a substitutable [`crate::backend::DescriptionBackend`].

use crate::backend::DescriptionBackend;
use crate::error::AeroscribeError;
use crate::progress::ProgressCallback;
use crate::prompts::DEFAULT_PROMPT;
use std::fmt;
use std::sync::Arc;

/// Default Ollama model identifier.
pub const DEFAULT_MODEL: &str = "llama3.2-vision";

/// Default Ollama host, used when neither the config nor `OLLAMA_HOST` says
/// otherwise.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Configuration for a batch description run.
///
/// Built via [`BatchConfig::builder()`] or [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use aeroscribe::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .model("llava")
///     .api_timeout_secs(120)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Model identifier sent to the inference daemon. Default: `"llama3.2-vision"`.
    pub model: String,

    /// Base URL of the inference daemon. If `None`, `OLLAMA_HOST` is
    /// consulted, then [`DEFAULT_HOST`].
    pub host: Option<String>,

    /// Prompt sent with every image. Default: [`DEFAULT_PROMPT`].
    pub prompt: String,

    /// Per-call HTTP timeout in seconds. Default: 300.
    ///
    /// Local vision models can take minutes per image on CPU-only machines,
    /// so this is deliberately generous. A timeout is treated like any other
    /// backend failure: error text is substituted and the batch continues.
    pub api_timeout_secs: u64,

    /// Convert scientific rasters (`.tif`/`.tiff`) to PNG during the scan.
    /// Default: true.
    pub convert_rasters: bool,

    /// Pre-constructed backend. Takes precedence over `host`/`model`; used
    /// by tests and by callers that need custom middleware.
    pub backend: Option<Arc<dyn DescriptionBackend>>,

    /// Per-image progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            host: None,
            prompt: DEFAULT_PROMPT.to_string(),
            api_timeout_secs: 300,
            convert_rasters: true,
            backend: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("model", &self.model)
            .field("host", &self.host)
            .field("prompt", &self.prompt)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("convert_rasters", &self.convert_rasters)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn DescriptionBackend>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// The daemon base URL after applying the `OLLAMA_HOST` fallback chain.
    pub fn resolved_host(&self) -> String {
        if let Some(ref h) = self.host {
            return h.clone();
        }
        match std::env::var("OLLAMA_HOST") {
            Ok(h) if !h.is_empty() => h,
            _ => DEFAULT_HOST.to_string(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn convert_rasters(mut self, v: bool) -> Self {
        self.config.convert_rasters = v;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn DescriptionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, AeroscribeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AeroscribeError::InvalidConfig(
                "Model name must not be empty".into(),
            ));
        }
        if c.prompt.trim().is_empty() {
            return Err(AeroscribeError::InvalidConfig(
                "Prompt must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
