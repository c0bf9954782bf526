//! Shared types, error model, and configuration for QROS.
//!
//! This crate is the foundation depended on by all other QROS crates.
//! It provides:
//! - [`QrosError`] — the unified error type
//! - Domain types ([`Document`], [`RetrievedSource`])
//! - Configuration ([`AppConfig`], [`RetrievalConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_MAX_RESULTS, DocsConfig, LlmConfig, RetrievalConfig, config_dir,
    config_file_path, expand_home, init_config, load_config, load_config_from, resolve_api_key,
    write_default_config,
};
pub use error::{QrosError, Result};
pub use types::{Document, RetrievedSource};
