//! Generation Service Clients
//!
//! This module provides the narrow interface the chatbot uses to reach an
//! external text-generation runtime. Model loading, tokenization and sampling
//! all happen inside the runtime; the chatbot only sends a prompt with
//! sampling parameters and receives text back.
//!
//! # Architecture
//!
//! - [`GenerationService`] - The trait every backend implements
//! - [`Provider`] - Runtime selection; builds a boxed service
//! - [`ModelKind`] - Encoder-decoder vs causal, resolved once per service
//!
//! # Supported Runtimes
//!
//! - `ollama` - Local Ollama server (`/api/generate`)
//! - `openai` - Any OpenAI-compatible `/completions` endpoint
//!
//! # Example
//!
//! ```ignore
//! use tinychat::llm::{GenerationParams, Provider};
//!
//! let provider = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2:3b".to_string(),
//!     kind: None,
//! };
//! let service = provider.create_service().await?;
//!
//! let reply = service.generate("User: hi\nAssistant:", &GenerationParams::default()).await?;
//! println!("{}", reply);
//! ```

/// Core generation trait, sampling parameters and provider selection.
pub mod client;
pub mod ollama;
pub mod openai;

pub use client::{clean_reply, GenerationParams, GenerationService, ModelKind, Provider};
