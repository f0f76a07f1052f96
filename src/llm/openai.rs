use crate::llm::client::{GenerationParams, GenerationService, ModelKind};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for OpenAI-style `/completions` endpoints.
///
/// Uses the legacy text completion API rather than chat completions: the
/// prompt is already a complete transcript and must reach the model verbatim.
pub struct OpenAIClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
    kind: ModelKind,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAIClient {
    pub fn new(api_base: String, api_key: Option<String>, model: String, kind: ModelKind) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            kind,
        }
    }
}

#[async_trait]
impl GenerationService for OpenAIClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let url = format!("{}/completions", self.api_base);
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");

        let mut builder = self.http.post(&url).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("OpenAI API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Completion request failed ({}): {}",
                status, text
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| AppError::Llm("No completion choices returned".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn model_kind(&self) -> ModelKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_is_dropped() {
        let client = OpenAIClient::new(
            "http://localhost:8080/v1/".to_string(),
            Some(String::new()),
            "qwen".to_string(),
            ModelKind::CausalLm,
        );
        assert!(client.api_key.is_none());
        assert_eq!(client.api_base, "http://localhost:8080/v1");
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest {
            model: "qwen",
            prompt: "User: hi\nAssistant:",
            max_tokens: 64,
            temperature: 0.5,
            top_p: 0.9,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "qwen");
        assert_eq!(value["max_tokens"], 64);
        assert_eq!(value["stream"], false);
    }
}
