//! `llm` slot.

use serde::{Deserialize, Serialize};

use crate::error::{MemlinkError, Result};
use crate::secret::ApiKey;

const SLOT: &str = "llm";

/// Language model used for memory extraction and update decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "config", deny_unknown_fields)]
pub enum LlmConfig {
    /// OpenAI-compatible chat completions (OpenAI, OpenRouter, ...).
    #[serde(rename = "openai")]
    OpenAi {
        /// Model identifier.
        model: String,
        /// Sampling temperature.
        temperature: f64,
        /// Credential; library falls back to its own env lookup when unset.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<ApiKey>,
        /// Alternate endpoint, e.g. OpenRouter.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        openai_base_url: Option<String>,
        /// Completion length cap.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_tokens: Option<u32>,
    },
    /// Google Gemini.
    #[serde(rename = "gemini")]
    Gemini {
        /// Model identifier.
        model: String,
        /// Sampling temperature.
        temperature: f64,
        /// Google API key.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<ApiKey>,
    },
    /// Local Ollama server.
    #[serde(rename = "ollama")]
    Ollama {
        /// Model tag.
        model: String,
        /// Sampling temperature.
        temperature: f64,
        /// Server URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ollama_base_url: Option<String>,
    },
}

impl LlmConfig {
    /// OpenAI-compatible model with no explicit credential or endpoint.
    #[must_use]
    pub fn openai(model: impl Into<String>, temperature: f64) -> Self {
        Self::OpenAi {
            model: model.into(),
            temperature,
            api_key: None,
            openai_base_url: None,
            max_tokens: None,
        }
    }

    /// Provider identifier as it appears on the wire.
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Gemini { .. } => "gemini",
            Self::Ollama { .. } => "ollama",
        }
    }

    /// Model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Gemini { model, .. } | Self::Ollama { model, .. } => {
                model
            }
        }
    }

    /// Sampling temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        match self {
            Self::OpenAi { temperature, .. }
            | Self::Gemini { temperature, .. }
            | Self::Ollama { temperature, .. } => *temperature,
        }
    }

    /// Check model, temperature and optional fields.
    ///
    /// # Errors
    /// Returns `MemlinkError::InvalidBackendOption` naming the bad option.
    pub fn validate(&self) -> Result<()> {
        if self.model().trim().is_empty() {
            return Err(MemlinkError::invalid(SLOT, "model must not be empty"));
        }
        let t = self.temperature();
        if !(0.0..=2.0).contains(&t) {
            return Err(MemlinkError::invalid(
                SLOT,
                format!("temperature {t} outside [0, 2]"),
            ));
        }
        match self {
            Self::OpenAi {
                openai_base_url,
                max_tokens,
                ..
            } => {
                if *max_tokens == Some(0) {
                    return Err(MemlinkError::invalid(SLOT, "max_tokens must be positive"));
                }
                super::check_url(SLOT, "openai_base_url", openai_base_url.as_deref())
            }
            Self::Ollama {
                ollama_base_url, ..
            } => super::check_url(SLOT, "ollama_base_url", ollama_base_url.as_deref()),
            Self::Gemini { .. } => Ok(()),
        }
    }
}
