//! Prompt and user-visible text contracts.
//!
//! Centralising these strings here serves two purposes:
//!
//! 1. **Single source of truth**: the prompt and the two fallback/error
//!    texts are part of the tool's observable output (they end up verbatim
//!    in exported documents), so changing them must happen in exactly one
//!    place.
//!
//! 2. **Testability**: tests assert against these constants instead of
//!    repeating string literals that could drift.
//!
//! Callers can override the prompt via
//! [`crate::config::BatchConfig::prompt`]; the constant here is used only
//! when no override is provided.

/// Default prompt sent with every image.
///
/// Used when `BatchConfig::prompt` is not overridden.
pub const DEFAULT_PROMPT: &str = "This is an image taken from a plane, describe it";

/// Description text used when the backend answered but the reply carried no
/// usable content.
///
/// Returned as a *successful* description so exporters never need to branch
/// on absence.
pub const NO_DESCRIPTION_FALLBACK: &str = "No description found or an error occurred.";

/// Prefix of the description text substituted when a backend call fails.
///
/// The batch coordinator appends the failure cause after this prefix. Kept
/// as a constant so downstream consumers that pattern-match exported output
/// (which only ever see free text) have a stable contract to match against.
pub const ERROR_PREFIX: &str = "Error generating description: ";

/// Format the substituted description for a failed backend call.
pub fn error_description(cause: &impl std::fmt::Display) -> String {
    format!("{ERROR_PREFIX}{cause}")
}
