//! Memory factory boundary and the shared client handle.
//!
//! The memory engine itself lives outside this crate. It is reached through
//! [`MemoryFactory`], which turns a [`MemoryBackendConfig`] into a client in
//! a single step. [`build_memory`] calls the factory exactly once and wraps
//! the result in a [`MemoryHandle`] that every consumer clones.

use std::ops::Deref;
use std::sync::Arc;

use tracing::{error, info};

use crate::backend::MemoryBackendConfig;
use crate::error::{BoxError, MemlinkError, Result};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Construct a memory client from a backend configuration.
///
/// Implementations may open connections or check model identifiers against
/// an upstream API. They must either return a ready client or fail; there is
/// no partially constructed state and callers do not retry.
pub trait MemoryFactory {
    /// The client produced on success.
    type Client: Send + Sync + 'static;
    /// Why construction failed.
    type Error: Into<BoxError>;

    /// Build a client for `config`.
    ///
    /// # Errors
    /// Returns the factory's own error if any slot is unsupported or
    /// invalid, or if a backend cannot be reached.
    fn from_config(
        &self,
        config: &MemoryBackendConfig,
    ) -> std::result::Result<Self::Client, Self::Error>;
}

impl<F: MemoryFactory + ?Sized> MemoryFactory for &F {
    type Client = F::Client;
    type Error = F::Error;

    fn from_config(
        &self,
        config: &MemoryBackendConfig,
    ) -> std::result::Result<Self::Client, Self::Error> {
        (**self).from_config(config)
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Shared handle to the process-wide memory client.
///
/// Cloning is cheap and every clone refers to the same client. Separate
/// calls to [`build_memory`] produce separate clients.
#[derive(Debug)]
pub struct MemoryHandle<C> {
    inner: Arc<C>,
}

impl<C> MemoryHandle<C> {
    /// Wrap an already-built client.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Whether two handles refer to the same client.
    #[must_use]
    pub fn same_client(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The underlying `Arc`, for consumers that store it directly.
    #[must_use]
    pub fn as_arc(&self) -> &Arc<C> {
        &self.inner
    }
}

impl<C> Clone for MemoryHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for MemoryHandle<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Invoke `factory` once with `config` and wrap the client in a handle.
///
/// The config reaches the factory unchanged. Validation is the factory's
/// job; see [`MemoryBackendConfig::validate`] for a ready-made check.
///
/// # Errors
/// Returns `MemlinkError::BackendConstruction` carrying the factory's error.
pub fn build_memory<F>(
    factory: &F,
    config: &MemoryBackendConfig,
) -> Result<MemoryHandle<F::Client>>
where
    F: MemoryFactory + ?Sized,
{
    info!(backend = %config.summary(), "Constructing memory client");
    match factory.from_config(config) {
        Ok(client) => {
            info!("Memory client ready");
            Ok(MemoryHandle::new(client))
        }
        Err(e) => {
            let e: BoxError = e.into();
            error!(error = %e, "Memory client construction failed");
            Err(MemlinkError::BackendConstruction(e))
        }
    }
}
