//! Description backend: the capability interface plus the Ollama client.
//!
//! [`DescriptionBackend`] is the seam the rest of the crate depends on:
//! anything that can take an image path and a prompt and return text (or
//! fail) can drive a batch. Tests substitute a scripted implementation; the
//! real one is [`OllamaBackend`], a thin `reqwest` client for the local
//! Ollama daemon's `/api/chat` endpoint.
//!
//! ## Response handling
//!
//! The reply text is read directly from the structured response field
//! (`message.content`) rather than pattern-matched out of a serialized
//! object. Two user-visible text contracts are preserved regardless:
//! an answered request with no usable content yields
//! [`crate::prompts::NO_DESCRIPTION_FALLBACK`] as a *successful*
//! description, and every failure surfaces to the coordinator as a
//! [`BackendError`] that it folds into error text rather than aborting
//! the batch.

use crate::prompts::NO_DESCRIPTION_FALLBACK;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A non-fatal error for a single backend call.
///
/// The batch coordinator converts these into description text; they never
/// abort the run.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The image file could not be read from disk.
    #[error("failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request itself failed (daemon unreachable, timeout, …).
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The daemon answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

/// Anything that can describe one image given a prompt.
///
/// Object-safe and `Send + Sync` so a single `Arc<dyn DescriptionBackend>`
/// can be stored in [`crate::config::BatchConfig`] and shared with tests.
#[async_trait]
pub trait DescriptionBackend: Send + Sync {
    /// Describe the image at `image_path`.
    ///
    /// `Ok` carries the description text (possibly the no-content fallback).
    /// `Err` means the call failed; the coordinator substitutes error text.
    async fn describe(&self, image_path: &Path, prompt: &str) -> Result<String, BackendError>;
}

// ── Ollama wire types ────────────────────────────────────────────────────

/// `POST /api/chat` request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

/// A single chat turn. `images` carries base64-encoded file contents.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

/// The subset of the `/api/chat` response this crate consumes.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

// ── Ollama client ────────────────────────────────────────────────────────

/// Client for a local Ollama daemon.
pub struct OllamaBackend {
    client: reqwest::Client,
    host: String,
    model: String,
}

impl OllamaBackend {
    /// Create a client for `host` (e.g. `http://localhost:11434`) using
    /// `model`, with a per-call timeout.
    pub fn new(
        host: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }
}

#[async_trait]
impl DescriptionBackend for OllamaBackend {
    async fn describe(&self, image_path: &Path, prompt: &str) -> Result<String, BackendError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|source| BackendError::ImageRead {
                path: image_path.to_path_buf(),
                source,
            })?;
        let b64 = STANDARD.encode(&bytes);
        debug!(
            "Encoded {} → {} bytes base64",
            image_path.display(),
            b64.len()
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                images: Some(vec![b64]),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .message
            .map(|m| m.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Ok(NO_DESCRIPTION_FALLBACK.to_string());
        }
        Ok(content)
    }
}
