//! Typed configuration for the pluggable memory backend.
//!
//! The memory library takes one nested mapping with exactly four slots,
//! each a `{ provider, config }` pair:
//!
//! ```text
//! vector_store  -> where embeddings live      (qdrant, chroma)
//! llm           -> extracts/updates memories  (openai, gemini, ollama)
//! embedder      -> text -> vector             (openai, ollama)
//! reranker      -> reorders search hits       (sentence_transformer, cohere)
//! ```
//!
//! Each slot is a tagged enum, so an unknown provider or an option that
//! belongs to another provider is rejected when the config is parsed rather
//! than inside the memory library.

pub mod embedder;
pub mod llm;
pub mod reranker;
pub mod vector_store;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{MemlinkError, Result};
use crate::settings::{LlmProviderKind, Settings};

pub use embedder::EmbedderConfig;
pub use llm::LlmConfig;
pub use reranker::RerankerConfig;
pub use vector_store::VectorStoreConfig;

/// The four top-level keys of the wire form, in order.
pub const SLOTS: [&str; 4] = ["vector_store", "llm", "embedder", "reranker"];

/// Complete backend selection handed to a [`crate::MemoryFactory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryBackendConfig {
    /// Vector database.
    pub vector_store: VectorStoreConfig,
    /// Language model.
    pub llm: LlmConfig,
    /// Embedding model.
    pub embedder: EmbedderConfig,
    /// Reranker.
    pub reranker: RerankerConfig,
}

impl Default for MemoryBackendConfig {
    /// Local Qdrant, an OpenAI-compatible LLM and embedder, and a local
    /// cross-encoder reranker.
    fn default() -> Self {
        Self {
            vector_store: VectorStoreConfig::qdrant("localhost", 6333),
            llm: LlmConfig::openai("google/gemini-3-flash-preview", 0.1),
            embedder: EmbedderConfig::openai("text-embedding-3-small"),
            reranker: RerankerConfig::sentence_transformer("cross-encoder/ms-marco-MiniLM-L-6-v2"),
        }
    }
}

impl MemoryBackendConfig {
    /// Build the backend selection from settings, routing credentials
    /// explicitly:
    ///
    /// - `openai` LLM: `openrouter_api_key`, plus `openrouter_base_url` when
    ///   that key is present;
    /// - `gemini` LLM: `google_api_key`;
    /// - `openai` embedder: `openai_api_key`;
    /// - Qdrant: `qdrant_api_key`.
    ///
    /// With every optional setting unset this equals [`Default::default`].
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let vector_store = VectorStoreConfig::Qdrant {
            host: settings.qdrant_host.clone(),
            port: settings.qdrant_port,
            api_key: settings.qdrant_api_key.clone(),
            https: settings.qdrant_https.then_some(true),
            collection_name: settings.qdrant_collection.clone(),
            embedding_model_dims: settings.embedding_dims,
        };

        let llm = match settings.llm_provider {
            LlmProviderKind::OpenAi => LlmConfig::OpenAi {
                model: settings.llm_model.clone(),
                temperature: settings.llm_temperature,
                api_key: settings.openrouter_api_key.clone(),
                openai_base_url: settings
                    .openrouter_api_key
                    .as_ref()
                    .map(|_| settings.openrouter_base_url.clone()),
                max_tokens: None,
            },
            LlmProviderKind::Gemini => LlmConfig::Gemini {
                model: settings.llm_model.clone(),
                temperature: settings.llm_temperature,
                api_key: settings.google_api_key.clone(),
            },
            LlmProviderKind::Ollama => LlmConfig::Ollama {
                model: settings.llm_model.clone(),
                temperature: settings.llm_temperature,
                ollama_base_url: Some(settings.ollama_base_url.clone()),
            },
        };

        let embedder = EmbedderConfig::OpenAi {
            model: settings.embedder_model.clone(),
            api_key: settings.openai_api_key.clone(),
            openai_base_url: None,
            embedding_dims: settings.embedding_dims,
        };

        let reranker = RerankerConfig::sentence_transformer(settings.reranker_model.clone());

        Self {
            vector_store,
            llm,
            embedder,
            reranker,
        }
    }

    /// Parse the untyped wire form.
    ///
    /// # Errors
    /// Returns `MemlinkError::BackendFormat` if the value is not a mapping,
    /// a slot is missing, an unknown key is present, or a slot fails to parse.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(map) = value.as_object() else {
            return Err(MemlinkError::BackendFormat(
                "backend config must be a mapping".into(),
            ));
        };
        if let Some(missing) = SLOTS.iter().find(|slot| !map.contains_key(**slot)) {
            return Err(MemlinkError::BackendFormat(format!(
                "missing required slot `{missing}`"
            )));
        }
        serde_json::from_value(value).map_err(|e| MemlinkError::BackendFormat(e.to_string()))
    }

    /// Parse the wire form from TOML.
    ///
    /// # Errors
    /// Returns `MemlinkError::BackendFormat` if the TOML is invalid or does
    /// not describe all four slots.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let value: Value =
            toml::from_str(toml_str).map_err(|e| MemlinkError::BackendFormat(e.to_string()))?;
        Self::from_value(value)
    }

    /// Load the wire form from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loading memory backend config file");
        Self::from_toml(&content)
    }

    /// The exact nested mapping handed to the memory library.
    ///
    /// # Errors
    /// Returns `MemlinkError::BackendFormat` if a value cannot be represented.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| MemlinkError::BackendFormat(e.to_string()))
    }

    /// Validate every slot's options.
    ///
    /// # Errors
    /// Returns the first `MemlinkError::InvalidBackendOption` found.
    pub fn validate(&self) -> Result<()> {
        self.vector_store.validate()?;
        self.llm.validate()?;
        self.embedder.validate()?;
        self.reranker.validate()
    }

    /// Provider and model per slot, safe to log.
    #[must_use]
    pub fn summary(&self) -> BackendSummary<'_> {
        BackendSummary(self)
    }
}

/// Log-friendly view of a [`MemoryBackendConfig`]; never prints credentials.
pub struct BackendSummary<'a>(&'a MemoryBackendConfig);

impl fmt::Display for BackendSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        let (host, port) = c.vector_store.endpoint();
        write!(
            f,
            "vector_store={}@{host}:{port} llm={}:{} embedder={}:{} reranker={}:{}",
            c.vector_store.provider(),
            c.llm.provider(),
            c.llm.model(),
            c.embedder.provider(),
            c.embedder.model(),
            c.reranker.provider(),
            c.reranker.model(),
        )
    }
}

/// Reject URLs without an http(s) scheme.
pub(crate) fn check_url(slot: &'static str, field: &str, url: Option<&str>) -> Result<()> {
    match url {
        Some(u) if !(u.starts_with("http://") || u.starts_with("https://")) => Err(
            MemlinkError::invalid(slot, format!("{field} `{u}` must start with http:// or https://")),
        ),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::ApiKey;
    use serde_json::json;

    fn literal_wire_form() -> Value {
        json!({
            "vector_store": {
                "provider": "qdrant",
                "config": { "host": "localhost", "port": 6333 }
            },
            "llm": {
                "provider": "openai",
                "config": { "model": "google/gemini-3-flash-preview", "temperature": 0.1 }
            },
            "embedder": {
                "provider": "openai",
                "config": { "model": "text-embedding-3-small" }
            },
            "reranker": {
                "provider": "sentence_transformer",
                "config": { "model": "cross-encoder/ms-marco-MiniLM-L-6-v2" }
            }
        })
    }

    #[test]
    fn default_matches_literal_wire_form() {
        let value = MemoryBackendConfig::default().to_value().expect("to_value");
        assert_eq!(value, literal_wire_form());
    }

    #[test]
    fn wire_form_has_exactly_four_slots() {
        let value = MemoryBackendConfig::default().to_value().expect("to_value");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 4);
        for slot in SLOTS {
            assert!(keys.contains(&slot), "missing {slot}");
        }
    }

    #[test]
    fn literal_wire_form_parses() {
        let config = MemoryBackendConfig::from_value(literal_wire_form()).expect("parse");
        assert_eq!(config, MemoryBackendConfig::default());
    }

    #[test]
    fn each_missing_slot_is_named() {
        for slot in SLOTS {
            let mut value = literal_wire_form();
            value.as_object_mut().expect("object").remove(slot);
            let err = MemoryBackendConfig::from_value(value).expect_err("should fail");
            assert!(err.to_string().contains(slot), "{slot}: {err}");
        }
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let mut value = literal_wire_form();
        value["graph_store"] = json!({ "provider": "neo4j", "config": {} });
        assert!(MemoryBackendConfig::from_value(value).is_err());
    }

    #[test]
    fn foreign_provider_option_is_rejected() {
        let mut value = literal_wire_form();
        value["llm"] = json!({
            "provider": "gemini",
            "config": {
                "model": "gemini-2.0-flash",
                "temperature": 0.1,
                "openai_base_url": "http://x"
            }
        });
        let err = MemoryBackendConfig::from_value(value).expect_err("should fail");
        assert!(matches!(err, MemlinkError::BackendFormat(_)));
        assert!(err.to_string().contains("openai_base_url"), "{err}");
    }

    #[test]
    fn misspelled_option_is_rejected() {
        let mut value = literal_wire_form();
        value["vector_store"]["config"]["ssl"] = json!(true);
        assert!(MemoryBackendConfig::from_value(value).is_err());

        let toml_str = r#"
            [vector_store]
            provider = "qdrant"
            config = { host = "qdrant", port = 6333, collection = "notes" }

            [llm]
            provider = "openai"
            config = { model = "gpt-4o-mini", temperature = 0.1 }

            [embedder]
            provider = "openai"
            config = { model = "text-embedding-3-small" }

            [reranker]
            provider = "sentence_transformer"
            config = { model = "cross-encoder/ms-marco-MiniLM-L-6-v2" }
        "#;
        let err = MemoryBackendConfig::from_toml(toml_str).expect_err("should fail");
        assert!(err.to_string().contains("collection"), "{err}");
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(MemoryBackendConfig::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn toml_form_parses() {
        let toml_str = r#"
            [vector_store]
            provider = "qdrant"
            config = { host = "qdrant", port = 6334, collection_name = "notes" }

            [llm]
            provider = "ollama"
            config = { model = "qwen2.5:1.5b", temperature = 0.7 }

            [embedder]
            provider = "ollama"
            config = { model = "nomic-embed-text" }

            [reranker]
            provider = "cohere"
            config = { model = "rerank-english-v3.0", top_k = 5 }
        "#;
        let config = MemoryBackendConfig::from_toml(toml_str).expect("parse");
        assert_eq!(config.vector_store.endpoint(), ("qdrant", 6334));
        assert_eq!(config.llm.provider(), "ollama");
        assert_eq!(config.embedder.model(), "nomic-embed-text");
        assert_eq!(config.reranker.provider(), "cohere");
        config.validate().expect("valid");
    }

    #[test]
    fn default_settings_reproduce_default_config() {
        let config = MemoryBackendConfig::from_settings(&Settings::default());
        assert_eq!(config, MemoryBackendConfig::default());
    }

    #[test]
    fn openrouter_key_is_routed_to_llm() {
        let settings = Settings {
            openrouter_api_key: Some(ApiKey::new("sk-or-1")),
            openai_api_key: Some(ApiKey::new("sk-oa-2")),
            ..Settings::default()
        };
        let value = MemoryBackendConfig::from_settings(&settings)
            .to_value()
            .expect("to_value");
        assert_eq!(value["llm"]["config"]["api_key"], "sk-or-1");
        assert_eq!(
            value["llm"]["config"]["openai_base_url"],
            "https://openrouter.ai/api/v1"
        );
        assert_eq!(value["embedder"]["config"]["api_key"], "sk-oa-2");
    }

    #[test]
    fn gemini_uses_google_key() {
        let settings = Settings {
            llm_provider: LlmProviderKind::Gemini,
            llm_model: "gemini-2.0-flash".into(),
            google_api_key: Some(ApiKey::new("g-123")),
            openrouter_api_key: Some(ApiKey::new("unused")),
            ..Settings::default()
        };
        let config = MemoryBackendConfig::from_settings(&settings);
        match &config.llm {
            LlmConfig::Gemini { api_key, model, .. } => {
                assert_eq!(model, "gemini-2.0-flash");
                assert_eq!(api_key.as_ref().map(ApiKey::expose), Some("g-123"));
            }
            other => panic!("unexpected llm {other:?}"),
        }
    }

    #[test]
    fn summary_hides_credentials() {
        let settings = Settings {
            openrouter_api_key: Some(ApiKey::new("sk-or-secret")),
            qdrant_api_key: Some(ApiKey::new("qd-secret")),
            ..Settings::default()
        };
        let config = MemoryBackendConfig::from_settings(&settings);
        let line = config.summary().to_string();
        assert!(line.starts_with("vector_store=qdrant@localhost:6333"));
        assert!(line.contains("reranker=sentence_transformer:cross-encoder/ms-marco-MiniLM-L-6-v2"));
        assert!(!line.contains("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }
}
