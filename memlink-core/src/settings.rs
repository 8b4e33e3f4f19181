//! Application settings, read once from the process environment.
//!
//! Every field maps to an environment variable of the same name (matched
//! case-insensitively, no prefix). Missing variables fall back to the
//! defaults below; present-but-malformed variables fail construction.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;

use config::{Config, Environment};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::Result;
use crate::secret::ApiKey;

/// Process-wide settings record.
///
/// Built once at startup and shared read-only (typically as `Arc<Settings>`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Origins permitted to make browser-based requests, in order.
    #[serde(default = "default_cors_origins", deserialize_with = "deserialize_origins")]
    pub cors_origins: Vec<String>,
    /// OpenRouter credential, used by the `openai` LLM slot.
    #[serde(default)]
    pub openrouter_api_key: Option<ApiKey>,
    /// Google credential, used by the `gemini` LLM slot.
    #[serde(default)]
    pub google_api_key: Option<ApiKey>,
    /// OpenAI credential, used by the `openai` embedder slot.
    #[serde(default)]
    pub openai_api_key: Option<ApiKey>,
    /// Minimum log level, overridden by `RUST_LOG` when set.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Qdrant host.
    #[serde(default = "default_qdrant_host")]
    pub qdrant_host: String,
    /// Qdrant REST port.
    #[serde(default = "default_qdrant_port", deserialize_with = "deserialize_port")]
    pub qdrant_port: u16,
    /// Qdrant API key (Qdrant Cloud).
    #[serde(default)]
    pub qdrant_api_key: Option<ApiKey>,
    /// Talk to Qdrant over TLS.
    #[serde(default)]
    pub qdrant_https: bool,
    /// Collection holding the memories (provider default when unset).
    #[serde(default)]
    pub qdrant_collection: Option<String>,

    /// Which LLM provider fills the `llm` slot.
    #[serde(default)]
    pub llm_provider: LlmProviderKind,
    /// LLM model identifier.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// LLM sampling temperature.
    #[serde(
        default = "default_llm_temperature",
        deserialize_with = "deserialize_temperature"
    )]
    pub llm_temperature: f64,
    /// Embedding model identifier.
    #[serde(default = "default_embedder_model")]
    pub embedder_model: String,
    /// Embedding vector dimensions (provider default when unset).
    #[serde(default, deserialize_with = "deserialize_dims")]
    pub embedding_dims: Option<usize>,
    /// Cross-encoder model identifier.
    #[serde(default = "default_reranker_model")]
    pub reranker_model: String,

    /// OpenAI-compatible endpoint used when an OpenRouter key is present.
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,
    /// Ollama endpoint for the `ollama` LLM provider.
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,
    /// Optional TOML file replacing the env-derived backend config.
    #[serde(default)]
    pub memory_config_path: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `MemlinkError::Settings` if any present variable fails to
    /// parse as its field type.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Environment::default())
    }

    /// Read settings from an explicit variable map instead of the process
    /// environment. Keys follow the same rules as real environment names.
    ///
    /// # Errors
    /// Same as [`Settings::from_env`].
    pub fn from_map<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self> {
        let settings: Self = Config::builder()
            .add_source(env.ignore_empty(true))
            .build()?
            .try_deserialize()?;

        debug!(
            cors_origins = ?settings.cors_origins,
            openrouter_key = settings.openrouter_api_key.is_some(),
            google_key = settings.google_api_key.is_some(),
            openai_key = settings.openai_api_key.is_some(),
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Whether `origin` is on the cross-origin allow-list.
    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_origins.iter().any(|o| o == "*" || o == origin)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cors_origins: default_cors_origins(),
            openrouter_api_key: None,
            google_api_key: None,
            openai_api_key: None,
            log_level: LogLevel::default(),
            qdrant_host: default_qdrant_host(),
            qdrant_port: default_qdrant_port(),
            qdrant_api_key: None,
            qdrant_https: false,
            qdrant_collection: None,
            llm_provider: LlmProviderKind::default(),
            llm_model: default_llm_model(),
            llm_temperature: default_llm_temperature(),
            embedder_model: default_embedder_model(),
            embedding_dims: None,
            reranker_model: default_reranker_model(),
            openrouter_base_url: default_openrouter_base_url(),
            ollama_base_url: default_ollama_base_url(),
            memory_config_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// Log level accepted in `LOG_LEVEL` (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Diagnostics.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Degraded but working.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "invalid log_level `{value}` (expected trace, debug, info, warn or error)"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LLM provider selectable through `LLM_PROVIDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LlmProviderKind {
    /// OpenAI-compatible API (routed to OpenRouter when its key is set).
    #[default]
    OpenAi,
    /// Google Gemini.
    Gemini,
    /// Local Ollama.
    Ollama,
}

impl TryFrom<String> for LlmProviderKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(format!(
                "invalid llm_provider `{value}` (expected openai, gemini or ollama)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// CORS_ORIGINS: JSON array or comma-separated list
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum OriginsInput {
    List(Vec<String>),
    Raw(String),
}

fn deserialize_origins<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins = match OriginsInput::deserialize(deserializer)? {
        OriginsInput::List(list) => list,
        OriginsInput::Raw(raw) => parse_origins(&raw).map_err(serde::de::Error::custom)?,
    };
    Ok(origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect())
}

fn parse_origins(raw: &str) -> std::result::Result<Vec<String>, String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| format!("invalid cors_origins JSON array `{trimmed}`: {e}"))
    } else {
        Ok(trimmed.split(',').map(str::to_string).collect())
    }
}

// ---------------------------------------------------------------------------
// Numeric fields: plain decimal text only
// ---------------------------------------------------------------------------

// `config` coerces words like `true`/`on` and `nan` into numbers; parse the
// raw string instead so those fail.
fn parse_strict<'de, D, T>(deserializer: D, field: &str) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| serde::de::Error::custom(format!("invalid {field} `{raw}`: {e}")))
}

fn deserialize_port<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    parse_strict(deserializer, "qdrant_port")
}

fn deserialize_temperature<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let t: f64 = parse_strict(deserializer, "llm_temperature")?;
    if t.is_finite() {
        Ok(t)
    } else {
        Err(serde::de::Error::custom(format!(
            "invalid llm_temperature `{t}`: must be finite"
        )))
    }
}

fn deserialize_dims<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_strict(deserializer, "embedding_dims").map(Some)
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_cors_origins() -> Vec<String> { vec!["http://localhost:1420".to_string()] }
fn default_qdrant_host() -> String { "localhost".to_string() }
fn default_qdrant_port() -> u16 { 6333 }
fn default_llm_model() -> String { "google/gemini-3-flash-preview".to_string() }
fn default_llm_temperature() -> f64 { 0.1 }
fn default_embedder_model() -> String { "text-embedding-3-small".to_string() }
fn default_reranker_model() -> String { "cross-encoder/ms-marco-MiniLM-L-6-v2".to_string() }
fn default_openrouter_base_url() -> String { "https://openrouter.ai/api/v1".to_string() }
fn default_ollama_base_url() -> String { "http://localhost:11434".to_string() }
