//! `reranker` slot.

use serde::{Deserialize, Serialize};

use crate::error::{MemlinkError, Result};
use crate::secret::ApiKey;

const SLOT: &str = "reranker";

/// Second-stage relevance scorer applied to retrieved candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "config", deny_unknown_fields)]
pub enum RerankerConfig {
    /// Local cross-encoder via sentence-transformers.
    #[serde(rename = "sentence_transformer")]
    SentenceTransformer {
        /// Cross-encoder model identifier.
        model: String,
        /// Keep at most this many candidates.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top_k: Option<usize>,
    },
    /// Cohere rerank API.
    #[serde(rename = "cohere")]
    Cohere {
        /// Rerank model identifier.
        model: String,
        /// Cohere API key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<ApiKey>,
        /// Keep at most this many candidates.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top_k: Option<usize>,
    },
}

impl RerankerConfig {
    /// Sentence-transformer cross-encoder with library defaults.
    #[must_use]
    pub fn sentence_transformer(model: impl Into<String>) -> Self {
        Self::SentenceTransformer {
            model: model.into(),
            top_k: None,
        }
    }

    /// Provider identifier as it appears on the wire.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::SentenceTransformer { .. } => "sentence_transformer",
            Self::Cohere { .. } => "cohere",
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::SentenceTransformer { model, .. } | Self::Cohere { model, .. } => model,
        }
    }

    /// Check model and `top_k`.
    ///
    /// # Errors
    /// Returns `MemlinkError::InvalidBackendOption` naming the bad option.
    pub fn validate(&self) -> Result<()> {
        if self.model().trim().is_empty() {
            return Err(MemlinkError::invalid(SLOT, "model must not be empty"));
        }
        let top_k = match self {
            Self::SentenceTransformer { top_k, .. } | Self::Cohere { top_k, .. } => *top_k,
        };
        if top_k == Some(0) {
            return Err(MemlinkError::invalid(SLOT, "top_k must be positive"));
        }
        Ok(())
    }
}
