//! Configuration loading, validation, and management for CampusBuddy.
//!
//! Loads configuration from `~/.campusbuddy/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Embedding providers the assistant knows how to construct.
pub const EMBEDDING_PROVIDERS: [&str; 2] = ["hashing", "ollama"];

/// The root configuration structure.
///
/// Maps directly to `~/.campusbuddy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Knowledge dataset location
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Embedding model selection
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Similarity search settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Per-conversation state bounds
    #[serde(default)]
    pub session: SessionConfig,

    /// Reply composition settings
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path to the JSON dataset. Defaults to `~/.campusbuddy/knowledge.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl KnowledgeConfig {
    /// The configured dataset path, or the default under the config dir.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("knowledge.json"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Vector width. Unset means 384 for `hashing`; for `ollama` the width
    /// is learned from the server at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,

    #[serde(default = "default_embedding_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hashing".into()
}
fn default_embedding_url() -> String {
    "http://localhost:11434".into()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimensions: None,
            url: default_embedding_url(),
            model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Matches below this cosine similarity are treated as noise.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

fn default_top_k() -> usize {
    3
}
fn default_min_similarity() -> f64 {
    0.3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_max_recent_queries")]
    pub max_recent_queries: usize,

    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Live sessions kept in memory; the least recently used is dropped
    /// when a new one would exceed this.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_max_recent_queries() -> usize {
    10
}
fn default_max_turns() -> usize {
    50
}
fn default_max_sessions() -> usize {
    1024
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_recent_queries: default_max_recent_queries(),
            max_turns: default_max_turns(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Probability of appending a campus-lore line to a reply.
    #[serde(default = "default_trivia_probability")]
    pub trivia_probability: f64,

    /// Seed for reproducible replies. Unset = fresh randomness per process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_trivia_probability() -> f64 {
    0.4
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            trivia_probability: default_trivia_probability(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.campusbuddy/config.toml).
    ///
    /// Environment variables override file values:
    /// - `CAMPUSBUDDY_KNOWLEDGE`
    /// - `CAMPUSBUDDY_EMBEDDING_PROVIDER`
    /// - `CAMPUSBUDDY_EMBEDDING_URL`
    /// - `CAMPUSBUDDY_EMBEDDING_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_path())
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("CAMPUSBUDDY_KNOWLEDGE") {
            self.knowledge.path = Some(PathBuf::from(path));
        }
        if let Some(provider) = lookup("CAMPUSBUDDY_EMBEDDING_PROVIDER") {
            self.embedding.provider = provider;
        }
        if let Some(url) = lookup("CAMPUSBUDDY_EMBEDDING_URL") {
            self.embedding.url = url;
        }
        if let Some(model) = lookup("CAMPUSBUDDY_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".campusbuddy")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.retrieval.min_similarity) {
            return Err(ConfigError::ValidationError(
                "retrieval.min_similarity must be between 0.0 and 1.0".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be at least 1".into(),
            ));
        }

        if self.embedding.dimensions == Some(0) {
            return Err(ConfigError::ValidationError(
                "embedding.dimensions must be at least 1".into(),
            ));
        }

        if !EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown embedding.provider '{}' (expected one of: {})",
                self.embedding.provider,
                EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if !(0.0..=1.0).contains(&self.composer.trivia_probability) {
            return Err(ConfigError::ValidationError(
                "composer.trivia_probability must be between 0.0 and 1.0".into(),
            ));
        }

        if self.session.max_recent_queries == 0
            || self.session.max_turns == 0
            || self.session.max_sessions == 0
        {
            return Err(ConfigError::ValidationError(
                "session.max_recent_queries, session.max_turns and session.max_sessions must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.embedding.provider, "hashing");
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.min_similarity - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.session.max_recent_queries, 10);
        assert_eq!(config.session.max_sessions, 1024);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.embedding.dimensions, config.embedding.dimensions);
        assert_eq!(parsed.retrieval.top_k, config.retrieval.top_k);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml_str = r#"
[retrieval]
top_k = 5

[composer]
seed = 7
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retrieval.top_k, 5);
        assert!((config.retrieval.min_similarity - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.composer.seed, Some(7));
        assert_eq!(config.embedding.model, "nomic-embed-text");
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.min_similarity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn dimensions_default_to_unset_and_zero_is_rejected() {
        let mut config = AppConfig::default();
        assert_eq!(config.embedding.dimensions, None);

        let parsed: AppConfig = toml::from_str("[embedding]\nprovider = \"ollama\"\ndimensions = 768\n").unwrap();
        assert_eq!(parsed.embedding.dimensions, Some(768));

        config.embedding.dimensions = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_sessions_rejected() {
        let mut config = AppConfig::default();
        config.session.max_sessions = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_provider_rejected() {
        let mut config = AppConfig::default();
        config.embedding.provider = "word2vec".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("word2vec"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().embedding.provider, "hashing");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[knowledge]\npath = \"/srv/campus.json\"\n[logging]\njson = true\n",
        )
        .unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.knowledge.resolved_path(), PathBuf::from("/srv/campus.json"));
        assert!(config.logging.json);
    }

    #[test]
    fn invalid_toml_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retrieval\ntop_k = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("CAMPUSBUDDY_EMBEDDING_PROVIDER", "ollama"),
            ("CAMPUSBUDDY_EMBEDDING_MODEL", "all-minilm"),
            ("CAMPUSBUDDY_KNOWLEDGE", "/tmp/kb.json"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.embedding.provider, "ollama");
        assert_eq!(config.embedding.model, "all-minilm");
        assert_eq!(config.embedding.url, "http://localhost:11434");
        assert_eq!(config.knowledge.path, Some(PathBuf::from("/tmp/kb.json")));
    }

    #[test]
    fn default_knowledge_path_lives_in_config_dir() {
        let config = AppConfig::default();
        let path = config.knowledge.resolved_path();
        assert!(path.starts_with(AppConfig::config_dir()));
        assert!(path.ends_with("knowledge.json"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("hashing"));
        assert!(toml_str.contains("min_similarity"));
    }
}
