use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Path used when `NOTES_AGENT_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub ai_model: AiModelConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiModelConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
}

impl Default for AiModelConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "qwen2.5".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            temperature: 0.1,
            top_p: 0.9,
            timeout_secs: 60,
        }
    }
}

impl AiModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub notes_dir: String,
    /// File extension for note files, with or without the leading dot.
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            notes_dir: "notes".to_string(),
            extension: "txt".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from the given path, falling back to defaults when
    /// the file does not exist. A file that exists but fails to parse is
    /// still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::from_file(path);
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override with environment variables if set
    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("OLLAMA_HOST") {
            self.ai_model.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.ai_model.model = model;
        }
        if let Ok(dir) = std::env::var("NOTES_DIR") {
            self.storage.notes_dir = dir;
        }
    }

    /// Create the notes directory if it doesn't exist
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.storage.notes_dir)
            .context("Failed to create notes directory")?;
        Ok(())
    }
}
