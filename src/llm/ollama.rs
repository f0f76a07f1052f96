use crate::llm::client::{GenerationParams, GenerationService, ModelKind};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Client for an Ollama server's raw completion endpoint.
///
/// Prompts are sent with `raw: true` so the server does not wrap them in the
/// model's own chat template; the prompt built by the memory is exactly what
/// the model sees.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    kind: ModelKind,
}

#[derive(Debug, Serialize)]
struct ShowRequest<'a> {
    model: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ShowResponse {
    #[serde(default)]
    details: Option<ModelDetails>,
    #[serde(default)]
    model_info: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelDetails {
    #[serde(default)]
    family: Option<String>,
}

impl ShowResponse {
    /// `general.architecture` from the GGUF metadata, falling back to the
    /// family reported in `details`.
    fn architecture(&self) -> Option<&str> {
        self.model_info
            .as_ref()
            .and_then(|info| info.get("general.architecture"))
            .and_then(Value::as_str)
            .or_else(|| self.details.as_ref().and_then(|d| d.family.as_deref()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    raw: bool,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
    /// Layers to offload; `Some(0)` pins the model to the CPU.
    #[serde(skip_serializing_if = "Option::is_none")]
    num_gpu: Option<u32>,
}

impl From<&GenerationParams> for GenerateOptions {
    fn from(params: &GenerationParams) -> Self {
        Self {
            num_predict: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            num_gpu: if params.use_gpu { None } else { Some(0) },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Connect to `base_url` and resolve the model kind.
    ///
    /// The model is looked up with `/api/show`, which also confirms the server
    /// is reachable and has the model. `kind` skips architecture detection.
    pub async fn connect(base_url: String, model: String, kind: Option<ModelKind>) -> Result<Self> {
        let http = reqwest::Client::new();
        let base_url = base_url.trim_end_matches('/').to_string();

        let show = fetch_model_info(&http, &base_url, &model).await?;
        let kind = match kind {
            Some(kind) => kind,
            None => match show.architecture() {
                Some(arch) => ModelKind::from_architecture(arch),
                None => {
                    warn!(model = %model, "Model architecture not reported, assuming causal");
                    ModelKind::default()
                }
            },
        };

        info!(
            model = %model,
            architecture = show.architecture().unwrap_or("unknown"),
            kind = %kind,
            "Connected to Ollama"
        );

        Ok(Self::with_kind(http, base_url, model, kind))
    }

    /// Build a client without contacting the server.
    pub fn with_kind(http: reqwest::Client, base_url: String, model: String, kind: ModelKind) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            kind,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn fetch_model_info(http: &reqwest::Client, base_url: &str, model: &str) -> Result<ShowResponse> {
    let url = format!("{}/api/show", base_url);
    debug!(url = %url, model = %model, "Looking up model");

    let response = http
        .post(&url)
        .json(&ShowRequest { model })
        .send()
        .await
        .map_err(|e| {
            AppError::Llm(format!(
                "Could not reach Ollama at {}: {}",
                base_url, e
            ))
        })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::Llm(format!(
            "Model '{}' not found on Ollama server (try `ollama pull {}`)",
            model, model
        )));
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::Llm(format!(
            "Ollama model lookup failed ({}): {}",
            status, text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Llm(format!("Failed to parse model info: {}", e)))
}

#[async_trait]
impl GenerationService for OllamaClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            raw: true,
            stream: false,
            options: params.into(),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generate request");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Ollama error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Ollama request failed ({}): {}",
                status, text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn model_kind(&self) -> ModelKind {
        self.kind
    }
}
