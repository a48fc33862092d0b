//! Error types shared by the inkwell widgets

use thiserror::Error;

/// Failures reported by a page-turn engine implementation.
///
/// The flipbook controller never propagates these to its callers; they are
/// logged and the controller falls back to a clean closed state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("page-turn engine construction failed: {0}")]
    Construct(String),

    #[error("page-turn engine could not load pages: {0}")]
    Load(String),

    #[error("page-turn engine destruction failed: {0}")]
    Destroy(String),
}

/// Errors raised while reading widget configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
