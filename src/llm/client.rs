//! Generation service abstraction and provider selection
//!
//! This module provides a narrow interface over external text-generation
//! runtimes:
//! - **Ollama**: local inference server, with model architecture detection
//! - **OpenAI-compatible**: any server exposing `/v1/completions`
//!   (llama.cpp server, vLLM, hosted endpoints)

use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default Ollama server address
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default OpenAI-compatible API base
pub const DEFAULT_OPENAI_BASE: &str = "http://localhost:8080/v1";

/// Marker that signals the model has started inventing the next user turn.
pub const USER_TAG: &str = "User:";

/// Text generation backend
///
/// Implementations take a fully rendered prompt and return only the newly
/// generated continuation, never the echoed prompt. Output may differ between
/// calls with identical input since sampling is always enabled.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a continuation for `prompt`
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;

    /// The model architecture, resolved when the service was created
    fn model_kind(&self) -> ModelKind;
}

#[async_trait]
impl<T: GenerationService + ?Sized> GenerationService for Box<T> {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        (**self).generate(prompt, params).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn model_kind(&self) -> ModelKind {
        (**self).model_kind()
    }
}

/// Sampling parameters passed with every generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold, in (0, 1]
    pub top_p: f32,
    /// Let the runtime offload layers to a GPU
    pub use_gpu: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 128,
            temperature: 0.7,
            top_p: 0.95,
            use_gpu: false,
        }
    }
}

impl GenerationParams {
    /// Check the parameters are usable by any backend
    pub fn validate(&self) -> Result<()> {
        if self.max_new_tokens == 0 {
            return Err(AppError::InvalidInput(
                "max_new_tokens must be greater than 0".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "temperature must be a non-negative number, got {}",
                self.temperature
            )));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(AppError::InvalidInput(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

/// Model architecture family
///
/// Encoder-decoder models answer the prompt; causal models continue it and
/// tend to keep writing the dialogue, so their replies get cut at the next
/// `User:` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Encoder-decoder (T5, BART, ...)
    Seq2Seq,
    /// Decoder-only (Llama, GPT, Mistral, ...)
    #[default]
    #[serde(rename = "causal")]
    CausalLm,
}

/// Architecture names reported by runtimes for encoder-decoder models
const SEQ2SEQ_ARCHITECTURES: &[&str] = &["t5", "mt5", "umt5", "bart", "mbart", "pegasus", "marian"];

impl ModelKind {
    /// Classify a runtime-reported architecture or family name
    pub fn from_architecture(architecture: &str) -> Self {
        let arch = architecture.trim().to_ascii_lowercase();
        if SEQ2SEQ_ARCHITECTURES.contains(&arch.as_str()) {
            ModelKind::Seq2Seq
        } else {
            ModelKind::CausalLm
        }
    }

    /// Post-process a raw generated reply for this kind of model
    pub fn clean_reply(&self, raw: &str) -> String {
        match self {
            ModelKind::CausalLm => clean_reply(raw),
            ModelKind::Seq2Seq => raw.trim().to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Seq2Seq => "seq2seq",
            ModelKind::CausalLm => "causal",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seq2seq" | "encoder-decoder" | "text2text" => Ok(ModelKind::Seq2Seq),
            "causal" | "causal-lm" | "causallm" | "decoder" => Ok(ModelKind::CausalLm),
            other => Err(AppError::InvalidInput(format!(
                "unknown model kind '{}', expected 'seq2seq' or 'causal'",
                other
            ))),
        }
    }
}

/// Trim a reply and cut it at the first `User:` tag, if any.
///
/// ```
/// use tinychat::llm::clean_reply;
///
/// assert_eq!(clean_reply("  ...blah User: foo bar"), "...blah");
/// ```
pub fn clean_reply(raw: &str) -> String {
    let reply = raw.trim();
    match reply.find(USER_TAG) {
        Some(idx) => reply[..idx].trim().to_string(),
        None => reply.to_string(),
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Ollama local inference server
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2:3b".to_string(),
    ///     kind: None,
    /// };
    /// ```
    ///
    /// When `kind` is `None` the architecture is looked up from the server.
    Ollama {
        base_url: String,
        model: String,
        kind: Option<ModelKind>,
    },

    /// OpenAI-compatible completion endpoint
    ///
    /// There is no portable way to ask these servers for a model's
    /// architecture, so `kind` defaults to [`ModelKind::CausalLm`].
    OpenAI {
        api_base: String,
        api_key: Option<String>,
        model: String,
        kind: Option<ModelKind>,
    },
}

impl Provider {
    /// Create the service for this provider
    ///
    /// The model kind is resolved here, once, and fixed for the lifetime of
    /// the returned service.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be reached or does not know
    /// the requested model.
    pub async fn create_service(&self) -> Result<Box<dyn GenerationService>> {
        match self {
            Provider::Ollama {
                base_url,
                model,
                kind,
            } => Ok(Box::new(
                super::ollama::OllamaClient::connect(base_url.clone(), model.clone(), *kind)
                    .await?,
            )),

            Provider::OpenAI {
                api_base,
                api_key,
                model,
                kind,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_base.clone(),
                api_key.clone(),
                model.clone(),
                kind.unwrap_or_default(),
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Ollama { .. } => "Ollama",
            Provider::OpenAI { .. } => "OpenAI",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::Ollama { model, .. } | Provider::OpenAI { model, .. } => model,
        }
    }
}
