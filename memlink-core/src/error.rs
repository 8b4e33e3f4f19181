//! Error types for settings loading and memory backend construction.

use thiserror::Error;

/// Boxed error returned by an external memory factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all startup configuration operations.
///
/// Every variant is fatal: callers are expected to abort initialisation
/// rather than retry or degrade.
#[derive(Error, Debug)]
pub enum MemlinkError {
    /// An environment value could not be coerced to its declared field type.
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    /// A backend slot carries an option the provider cannot accept.
    #[error("Invalid {slot} option: {reason}")]
    InvalidBackendOption {
        /// Which slot (`vector_store`, `llm`, `embedder`, `reranker`).
        slot: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Untyped backend configuration did not match the four-slot wire form.
    #[error("Backend config format error: {0}")]
    BackendFormat(String),

    /// The memory factory rejected the configuration.
    #[error("Memory backend construction failed: {0}")]
    BackendConstruction(#[source] BoxError),

    /// Tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemlinkError {
    /// Shorthand for an [`MemlinkError::InvalidBackendOption`].
    pub(crate) fn invalid(slot: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidBackendOption {
            slot,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MemlinkError>;
