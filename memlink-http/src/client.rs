//! HTTP memory factory. Validates the backend config and checks that the
//! vector store answers before handing out a client.

use std::time::{Duration, Instant};

use memlink_core::{ApiKey, MemoryBackendConfig, MemoryFactory, VectorStoreConfig};
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::error::HttpFactoryError;

/// Default probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory producing [`RemoteMemory`] clients.
///
/// Uses a blocking HTTP client: call it during startup before an async
/// runtime is running, or from `spawn_blocking`.
#[derive(Debug)]
pub struct HttpMemoryFactory {
    http: Client,
    timeout: Duration,
    probe: bool,
}

impl HttpMemoryFactory {
    /// Create a factory that probes the vector store with `timeout`.
    ///
    /// # Errors
    /// Returns `HttpFactoryError::Client` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, HttpFactoryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpFactoryError::Client(e.to_string()))?;
        Ok(Self {
            http,
            timeout,
            probe: true,
        })
    }

    /// Skip the readiness probe; only validate the config.
    #[must_use]
    pub fn without_probe(mut self) -> Self {
        self.probe = false;
        self
    }
}

impl MemoryFactory for HttpMemoryFactory {
    type Client = RemoteMemory;
    type Error = HttpFactoryError;

    fn from_config(&self, config: &MemoryBackendConfig) -> Result<RemoteMemory, HttpFactoryError> {
        config.validate()?;

        let memory = RemoteMemory {
            http: self.http.clone(),
            base_url: vector_store_url(&config.vector_store),
            config: config.clone(),
            timeout: self.timeout,
        };

        if self.probe {
            memory.health()?;
        } else {
            debug!(url = %memory.base_url, "Skipping vector store probe");
        }
        Ok(memory)
    }
}

/// A validated backend with a reachable vector store.
#[derive(Debug)]
pub struct RemoteMemory {
    http: Client,
    base_url: String,
    config: MemoryBackendConfig,
    timeout: Duration,
}

impl RemoteMemory {
    /// Root URL of the vector store.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The config this client was built from.
    #[must_use]
    pub fn config(&self) -> &MemoryBackendConfig {
        &self.config
    }

    /// Probe the vector store's readiness endpoint.
    ///
    /// # Errors
    /// Returns `Unreachable`, `Timeout` or `Unhealthy` depending on how the
    /// probe failed.
    pub fn health(&self) -> Result<(), HttpFactoryError> {
        let url = format!("{}{}", self.base_url, readiness_path(&self.config.vector_store));
        let mut request = self.http.get(&url);
        if let Some(key) = vector_store_key(&self.config.vector_store) {
            request = request.header("api-key", key.expose());
        }

        let start = Instant::now();
        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                warn!(%url, "Vector store probe timed out");
                HttpFactoryError::Timeout {
                    url: url.clone(),
                    timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                }
            } else {
                warn!(%url, error = %e, "Vector store probe failed");
                HttpFactoryError::Unreachable {
                    url: url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            info!(%url, elapsed = ?start.elapsed(), "Vector store ready");
            Ok(())
        } else {
            warn!(%url, status = status.as_u16(), "Vector store not ready");
            Err(HttpFactoryError::Unhealthy {
                url,
                status: status.as_u16(),
            })
        }
    }
}

fn vector_store_url(store: &VectorStoreConfig) -> String {
    let (host, port) = store.endpoint();
    let scheme = match store {
        VectorStoreConfig::Qdrant {
            https: Some(true), ..
        } => "https",
        _ => "http",
    };
    // IPv6 literals need brackets in the authority.
    if host.contains(':') && !host.starts_with('[') {
        format!("{scheme}://[{host}]:{port}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}

fn readiness_path(store: &VectorStoreConfig) -> &'static str {
    match store {
        VectorStoreConfig::Qdrant { .. } => "/readyz",
        VectorStoreConfig::Chroma { .. } => "/api/v2/heartbeat",
    }
}

fn vector_store_key(store: &VectorStoreConfig) -> Option<&ApiKey> {
    match store {
        VectorStoreConfig::Qdrant { api_key, .. } => api_key.as_ref(),
        VectorStoreConfig::Chroma { .. } => None,
    }
}
