//! # memlink-core
//!
//! Startup configuration for a memory-augmented API process:
//!
//! - [`Settings`]: typed, environment-driven application settings
//!   (cross-origin allow-list, provider credentials, backend knobs).
//! - [`MemoryBackendConfig`]: the four pluggable memory subsystems
//!   (vector store, LLM, embedder, reranker) as tagged provider variants.
//! - [`MemoryFactory`] / [`MemoryHandle`]: the boundary to the external
//!   memory engine and the shared client it produces.
//! - [`AppContext`]: builds both once and hands them out explicitly.
//!
//! Everything here runs once, synchronously, before the process starts
//! serving. Any failure is fatal and surfaces as a [`MemlinkError`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod bootstrap;
pub mod error;
pub mod factory;
pub mod secret;
pub mod settings;
pub mod telemetry;

pub use backend::{
    EmbedderConfig, LlmConfig, MemoryBackendConfig, RerankerConfig, VectorStoreConfig,
};
pub use bootstrap::AppContext;
pub use error::{MemlinkError, Result};
pub use factory::{MemoryFactory, MemoryHandle, build_memory};
pub use secret::ApiKey;
pub use settings::{LlmProviderKind, LogLevel, Settings};
