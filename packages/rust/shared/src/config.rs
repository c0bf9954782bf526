//! Application configuration for QROS.
//!
//! User config lives at `~/.qros/qros.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{QrosError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "qros.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".qros";

/// Default number of grounding sources handed to the QA flow.
pub const DEFAULT_MAX_RESULTS: usize = 3;

// ---------------------------------------------------------------------------
// Config structs (matching qros.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Grounding document collection.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Completion service settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// `[docs]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Directory holding the grounding documents. Relative paths resolve
    /// against the working directory; a leading `~` expands to home.
    #[serde(default = "default_docs_dir")]
    pub dir: String,

    /// Maximum number of sources returned per question.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// File extensions to include (without the dot). Empty means all files.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: default_docs_dir(),
            max_results: default_max_results(),
            extensions: Vec::new(),
        }
    }
}

fn default_docs_dir() -> String {
    "docs".into()
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "google/gemini-2.0-flash-001".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl LlmConfig {
    /// Request deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse and validate `base_url`.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            QrosError::config(format!("invalid llm.base_url '{}': {e}", self.base_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(QrosError::config(format!(
                "llm.base_url must be http or https, got '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Retrieval config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime retrieval configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Resolved document directory.
    pub docs_dir: PathBuf,
    /// Maximum number of sources per question.
    pub max_results: usize,
    /// Extension allow-list, lowercased, without dots.
    pub extensions: Vec<String>,
}

impl From<&AppConfig> for RetrievalConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            docs_dir: expand_home(&config.docs.dir),
            max_results: config.docs.max_results,
            extensions: config
                .docs
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| (path == "~").then_some("")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.qros/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| QrosError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.qros/qros.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QrosError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| QrosError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    write_default_config(&path)?;
    Ok(path)
}

/// Write a default config file to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| QrosError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| QrosError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| QrosError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

/// Read the completion-service API key from the configured env var.
pub fn resolve_api_key(config: &AppConfig) -> Result<String> {
    let var_name = &config.llm.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(QrosError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_results"));
        assert!(toml_str.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[docs]
dir = "/srv/ros-docs"

[llm]
model = "some/model"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.docs.dir, "/srv/ros-docs");
        assert_eq!(config.docs.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(config.llm.model, "some/model");
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.llm.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn retrieval_config_normalizes_extensions() {
        let mut app = AppConfig::default();
        app.docs.extensions = vec![".MD".into(), "txt".into(), "".into()];
        let retrieval = RetrievalConfig::from(&app);
        assert_eq!(retrieval.extensions, vec!["md", "txt"]);
        assert_eq!(retrieval.max_results, 3);
        assert_eq!(retrieval.docs_dir, PathBuf::from("docs"));
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("docs"), PathBuf::from("docs"));
        assert_eq!(expand_home("/abs/docs"), PathBuf::from("/abs/docs"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/ros"), home.join("ros"));
        }
    }

    #[test]
    fn base_url_validation() {
        let mut llm = LlmConfig::default();
        assert!(llm.parsed_base_url().is_ok());

        llm.base_url = "ftp://example.com".into();
        assert!(llm.parsed_base_url().is_err());

        llm.base_url = "not a url".into();
        assert!(llm.parsed_base_url().is_err());
    }

    #[test]
    fn write_and_load_default_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("qros.toml");
        write_default_config(&path).expect("write config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.docs.dir, "docs");
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.llm.api_key_env = "QROS_TEST_NONEXISTENT_KEY_12345".into();
        let result = resolve_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
