//! `vector_store` slot.

use serde::{Deserialize, Serialize};

use crate::error::{MemlinkError, Result};
use crate::secret::ApiKey;

const SLOT: &str = "vector_store";

/// Vector database holding memory embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "config", deny_unknown_fields)]
pub enum VectorStoreConfig {
    /// Qdrant over its REST port.
    #[serde(rename = "qdrant")]
    Qdrant {
        /// Hostname or IP.
        host: String,
        /// REST port.
        port: u16,
        /// Qdrant Cloud API key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<ApiKey>,
        /// Use TLS.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        https: Option<bool>,
        /// Collection name; library default when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collection_name: Option<String>,
        /// Must match the embedder's output size.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        embedding_model_dims: Option<usize>,
    },
    /// Chroma server.
    #[serde(rename = "chroma")]
    Chroma {
        /// Hostname or IP.
        host: String,
        /// HTTP port.
        port: u16,
        /// Collection name; library default when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        collection_name: Option<String>,
    },
}

impl VectorStoreConfig {
    /// A plain Qdrant connection with library defaults for everything else.
    #[must_use]
    pub fn qdrant(host: impl Into<String>, port: u16) -> Self {
        Self::Qdrant {
            host: host.into(),
            port,
            api_key: None,
            https: None,
            collection_name: None,
            embedding_model_dims: None,
        }
    }

    /// Provider identifier as it appears on the wire.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Qdrant { .. } => "qdrant",
            Self::Chroma { .. } => "chroma",
        }
    }

    /// `(host, port)` of the store.
    #[must_use]
    pub fn endpoint(&self) -> (&str, u16) {
        match self {
            Self::Qdrant { host, port, .. } | Self::Chroma { host, port, .. } => {
                (host.as_str(), *port)
            }
        }
    }

    /// Check host/port and optional fields.
    ///
    /// # Errors
    /// Returns `MemlinkError::InvalidBackendOption` naming the bad option.
    pub fn validate(&self) -> Result<()> {
        let (host, port) = self.endpoint();
        if host.trim().is_empty() {
            return Err(MemlinkError::invalid(SLOT, "host must not be empty"));
        }
        if port == 0 {
            return Err(MemlinkError::invalid(SLOT, "port must be non-zero"));
        }
        match self {
            Self::Qdrant {
                collection_name,
                embedding_model_dims,
                ..
            } => {
                check_collection(collection_name.as_deref())?;
                if *embedding_model_dims == Some(0) {
                    return Err(MemlinkError::invalid(
                        SLOT,
                        "embedding_model_dims must be positive",
                    ));
                }
            }
            Self::Chroma {
                collection_name, ..
            } => check_collection(collection_name.as_deref())?,
        }
        Ok(())
    }
}

fn check_collection(name: Option<&str>) -> Result<()> {
    match name {
        Some(n) if n.trim().is_empty() => Err(MemlinkError::invalid(
            SLOT,
            "collection_name must not be empty",
        )),
        _ => Ok(()),
    }
}
