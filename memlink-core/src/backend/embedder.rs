//! `embedder` slot.

use serde::{Deserialize, Serialize};

use crate::error::{MemlinkError, Result};
use crate::secret::ApiKey;

const SLOT: &str = "embedder";

/// Text embedding model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "config", deny_unknown_fields)]
pub enum EmbedderConfig {
    /// OpenAI-compatible embeddings endpoint.
    #[serde(rename = "openai")]
    OpenAi {
        /// Model identifier.
        model: String,
        /// Credential; library falls back to its own env lookup when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<ApiKey>,
        /// Alternate endpoint.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        openai_base_url: Option<String>,
        /// Requested output dimensions.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        embedding_dims: Option<usize>,
    },
    /// Local Ollama embeddings.
    #[serde(rename = "ollama")]
    Ollama {
        /// Model tag.
        model: String,
        /// Server URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ollama_base_url: Option<String>,
    },
}

impl EmbedderConfig {
    /// OpenAI embedder with library defaults.
    #[must_use]
    pub fn openai(model: impl Into<String>) -> Self {
        Self::OpenAi {
            model: model.into(),
            api_key: None,
            openai_base_url: None,
            embedding_dims: None,
        }
    }

    /// Provider identifier as it appears on the wire.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Ollama { .. } => "ollama",
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Check model and optional fields.
    ///
    /// # Errors
    /// Returns `MemlinkError::InvalidBackendOption` naming the bad option.
    pub fn validate(&self) -> Result<()> {
        if self.model().trim().is_empty() {
            return Err(MemlinkError::invalid(SLOT, "model must not be empty"));
        }
        match self {
            Self::OpenAi {
                openai_base_url,
                embedding_dims,
                ..
            } => {
                if *embedding_dims == Some(0) {
                    return Err(MemlinkError::invalid(SLOT, "embedding_dims must be positive"));
                }
                super::check_url(SLOT, "openai_base_url", openai_base_url.as_deref())
            }
            Self::Ollama {
                ollama_base_url, ..
            } => super::check_url(SLOT, "ollama_base_url", ollama_base_url.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dims_is_rejected() {
        let embedder = EmbedderConfig::OpenAi {
            model: "text-embedding-3-small".into(),
            api_key: None,
            openai_base_url: None,
            embedding_dims: Some(0),
        };
        assert!(embedder.validate().is_err());
    }

    #[test]
    fn default_openai_embedder_is_valid() {
        let embedder = EmbedderConfig::openai("text-embedding-3-small");
        embedder.validate().expect("valid");
        assert_eq!(embedder.provider(), "openai");
    }
}
