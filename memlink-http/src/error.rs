//! HTTP factory error types.

use thiserror::Error;

/// Errors that can occur while constructing a [`crate::RemoteMemory`].
#[derive(Debug, Error)]
pub enum HttpFactoryError {
    /// The backend config failed option validation.
    #[error("Invalid memory backend config: {0}")]
    InvalidConfig(#[from] memlink_core::MemlinkError),

    /// The vector store could not be reached at all.
    #[error("Vector store unreachable at {url}: {reason}")]
    Unreachable {
        /// Probe URL.
        url: String,
        /// Transport error.
        reason: String,
    },

    /// The vector store answered but is not ready.
    #[error("Vector store at {url} not ready: HTTP {status}")]
    Unhealthy {
        /// Probe URL.
        url: String,
        /// Response status.
        status: u16,
    },

    /// Probe timed out.
    #[error("Vector store probe at {url} timed out after {timeout_ms}ms")]
    Timeout {
        /// Probe URL.
        url: String,
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}
