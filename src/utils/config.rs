//! TOML-based configuration for tinychat
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. `tinychat.toml` in the working directory, or the file given by `--config`
//! 3. Environment variables and command-line flags (applied by the CLI)
//!
//! Every field is optional in the file:
//!
//! ```toml
//! [model]
//! name = "llama3.2:3b"
//! provider = "ollama"
//! base_url = "http://localhost:11434"
//! kind = "causal"
//!
//! [memory]
//! window = 4
//!
//! [generation]
//! max_new_tokens = 128
//! temperature = 0.7
//! top_p = 0.95
//! use_gpu = false
//! ```

use crate::llm::client::{DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_BASE};
use crate::llm::{GenerationParams, ModelKind, Provider};
use crate::memory::DEFAULT_WINDOW_TURNS;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "tinychat.toml";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Root configuration structure loaded from tinychat.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub model: ModelConfig,
    pub memory: MemoryConfig,
    pub generation: GenerationParams,
}

// ============= Model Configuration =============

/// Which runtime serves the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    #[default]
    Ollama,
    /// OpenAI-compatible `/completions` endpoint
    #[value(name = "openai")]
    OpenAI,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name/identifier to use with the provider
    pub name: String,

    pub provider: ProviderKind,

    /// Server address; falls back to `OLLAMA_URL` or the provider default
    pub base_url: Option<String>,

    /// Force the model kind instead of detecting it
    pub kind: Option<ModelKind>,

    /// Environment variable holding an API key for OpenAI-compatible servers
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            provider: ProviderKind::Ollama,
            base_url: None,
            kind: None,
            api_key_env: default_api_key_env(),
        }
    }
}

// ============= Memory Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// How many recent turns to remember
    pub window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW_TURNS,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ChatConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: ChatConfig = toml::from_str(&content)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load an explicit file, or `tinychat.toml` if it exists, or defaults.
    ///
    /// An explicitly requested file that does not exist is an error; a
    /// missing default file is not.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model name must not be empty".to_string(),
            ));
        }

        self.generation
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(())
    }

    /// Resolve the runtime to talk to.
    ///
    /// For Ollama the base URL comes from the config, then `OLLAMA_URL`, then
    /// the local default. For OpenAI-compatible servers the API key is read
    /// from the variable named by `api_key_env`.
    pub fn provider(&self) -> Provider {
        match self.model.provider {
            ProviderKind::Ollama => Provider::Ollama {
                base_url: self
                    .model
                    .base_url
                    .clone()
                    .or_else(|| env::var("OLLAMA_URL").ok())
                    .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                model: self.model.name.clone(),
                kind: self.model.kind,
            },
            ProviderKind::OpenAI => Provider::OpenAI {
                api_base: self
                    .model
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
                api_key: env::var(&self.model.api_key_env).ok(),
                model: self.model.name.clone(),
                kind: self.model.kind,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert_eq!(config.model.provider, ProviderKind::Ollama);
        assert_eq!(config.memory.window, 4);
        assert_eq!(config.generation, GenerationParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(
            r#"
[model]
name = "flan-t5"
kind = "seq2seq"

[generation]
temperature = 0.2
"#,
        );

        let config = ChatConfig::load(file.path()).unwrap();
        assert_eq!(config.model.name, "flan-t5");
        assert_eq!(config.model.kind, Some(ModelKind::Seq2Seq));
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_new_tokens, 128);
        assert_eq!(config.memory.window, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ChatConfig::load("/definitely/not/here/tinychat.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_config("[model\nname = ");
        assert!(matches!(
            ChatConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_top_p() {
        let file = write_config("[generation]\ntop_p = 0.0\n");
        assert!(matches!(
            ChatConfig::load(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_window_is_valid() {
        let file = write_config("[memory]\nwindow = 0\n");
        let config = ChatConfig::load(file.path()).unwrap();
        assert_eq!(config.memory.window, 0);
    }

    #[test]
    fn test_empty_model_name_rejected() {
        let mut config = ChatConfig::default();
        config.model.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_openai_provider_uses_configured_base() {
        let mut config = ChatConfig::default();
        config.model.provider = ProviderKind::OpenAI;
        config.model.base_url = Some("http://127.0.0.1:9000/v1".to_string());
        config.model.api_key_env = "TINYCHAT_TEST_UNSET_KEY_VAR".to_string();

        match config.provider() {
            Provider::OpenAI {
                api_base,
                api_key,
                model,
                ..
            } => {
                assert_eq!(api_base, "http://127.0.0.1:9000/v1");
                assert!(api_key.is_none());
                assert_eq!(model, DEFAULT_MODEL);
            }
            _ => panic!("Expected OpenAI provider"),
        }
    }

    #[test]
    fn test_ollama_provider_prefers_configured_url() {
        let mut config = ChatConfig::default();
        config.model.base_url = Some("http://gpu-box:11434".to_string());

        match config.provider() {
            Provider::Ollama { base_url, kind, .. } => {
                assert_eq!(base_url, "http://gpu-box:11434");
                assert!(kind.is_none());
            }
            _ => panic!("Expected Ollama provider"),
        }
    }
}
