//! # memlink-http: HTTP-backed memory factory
//!
//! A [`memlink_core::MemoryFactory`] that checks the backend before handing
//! out a client:
//!
//! 1. option validation of all four slots;
//! 2. a readiness probe against the vector store
//!    (`/readyz` for Qdrant, `/api/v2/heartbeat` for Chroma).
//!
//! Either step failing aborts construction; nothing is retried.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;

pub use client::{DEFAULT_TIMEOUT, HttpMemoryFactory, RemoteMemory};
pub use error::HttpFactoryError;
