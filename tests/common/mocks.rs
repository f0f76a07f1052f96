//! Mock implementations for testing.
//!
//! This module provides a mock generation service that can be used across
//! different test files without duplication.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tinychat::llm::{GenerationParams, GenerationService, ModelKind};
use tinychat::types::{AppError, Result};

/// Mock generation service with scripted replies.
///
/// Replies are handed out in order; once the script runs out the last reply
/// is repeated. Every prompt and parameter set is recorded so tests can
/// check exactly what would have reached the model.
///
/// # Examples
///
/// ```ignore
/// // Always answers "Hello!"
/// let service = MockGenerator::new("Hello!");
///
/// // Answers "one", then "two"
/// let service = MockGenerator::scripted(&["one", "two"]);
///
/// // Always fails
/// let service = MockGenerator::failing();
/// ```
#[derive(Clone)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<String>>>,
    last: Arc<Mutex<String>>,
    calls: Arc<Mutex<Vec<(String, GenerationParams)>>>,
    kind: ModelKind,
    should_fail: bool,
}

impl MockGenerator {
    /// Create a mock service that always returns `reply`.
    pub fn new(reply: &str) -> Self {
        Self::scripted(&[reply])
    }

    /// Create a mock service returning `replies` in order.
    pub fn scripted(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.iter().map(|r| r.to_string()).collect())),
            last: Arc::new(Mutex::new(String::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            kind: ModelKind::CausalLm,
            should_fail: false,
        }
    }

    /// Create a mock service that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    /// Report `kind` as the model architecture.
    pub fn with_kind(mut self, kind: ModelKind) -> Self {
        self.kind = kind;
        self
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    /// Parameters received with each call, in order.
    pub fn params(&self) -> Vec<GenerationParams> {
        self.calls.lock().unwrap().iter().map(|(_, p)| *p).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for MockGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), *params));

        if self.should_fail {
            return Err(AppError::Llm("Mock generation failure".to_string()));
        }

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn model_kind(&self) -> ModelKind {
        self.kind
    }
}
