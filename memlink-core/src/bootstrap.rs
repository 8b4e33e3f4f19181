//! Startup wiring.
//!
//! Settings and the memory client are built once here and then passed
//! explicitly to whatever needs them; nothing in this crate keeps them in a
//! global.
//!
//! ```no_run
//! use memlink_core::{AppContext, MemoryBackendConfig, MemoryFactory};
//!
//! struct Noop;
//! impl MemoryFactory for Noop {
//!     type Client = ();
//!     type Error = std::convert::Infallible;
//!     fn from_config(&self, _: &MemoryBackendConfig) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//!
//! memlink_core::bootstrap::load_dotenv();
//! let ctx = AppContext::from_env(&Noop).expect("startup");
//! let for_handlers = ctx.clone();
//! # let _ = for_handlers;
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::MemoryBackendConfig;
use crate::error::Result;
use crate::factory::{MemoryFactory, MemoryHandle, build_memory};
use crate::settings::Settings;

/// Load variables from a `.env` file in the working directory or a parent,
/// if one exists. Variables already set in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Ignoring unreadable .env"),
    }
}

/// Everything built during startup.
#[derive(Debug)]
pub struct AppContext<C> {
    /// Immutable settings.
    pub settings: Arc<Settings>,
    /// The one memory client for this process.
    pub memory: MemoryHandle<C>,
}

impl<C> Clone for AppContext<C> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            memory: self.memory.clone(),
        }
    }
}

impl<C: Send + Sync + 'static> AppContext<C> {
    /// Build the memory client from `settings` using `factory`.
    ///
    /// The backend config comes from `memory_config_path` when set, else
    /// from [`MemoryBackendConfig::from_settings`].
    ///
    /// # Errors
    /// Fails if the config file cannot be loaded or the factory rejects it.
    pub fn bootstrap<F>(settings: Settings, factory: &F) -> Result<Self>
    where
        F: MemoryFactory<Client = C> + ?Sized,
    {
        let backend = backend_config(&settings)?;
        let memory = build_memory(factory, &backend)?;
        info!(
            cors_origins = settings.cors_origins.len(),
            "Startup configuration complete"
        );
        Ok(Self {
            settings: Arc::new(settings),
            memory,
        })
    }

    /// [`Settings::from_env`] followed by [`AppContext::bootstrap`].
    ///
    /// # Errors
    /// Fails on malformed environment values or backend construction errors.
    pub fn from_env<F>(factory: &F) -> Result<Self>
    where
        F: MemoryFactory<Client = C> + ?Sized,
    {
        Self::bootstrap(Settings::from_env()?, factory)
    }
}

/// Resolve the backend config for `settings`.
///
/// # Errors
/// Fails if `memory_config_path` is set but unreadable or invalid.
pub fn backend_config(settings: &Settings) -> Result<MemoryBackendConfig> {
    match &settings.memory_config_path {
        Some(path) => MemoryBackendConfig::from_file(path),
        None => Ok(MemoryBackendConfig::from_settings(settings)),
    }
}
