//! # tinychat
//!
//! A tiny command-line chatbot built in Rust. It keeps a short sliding window
//! of the conversation, turns it into a plain-text prompt, and asks an
//! external model runtime (Ollama or any OpenAI-compatible completion server)
//! for the reply.
//!
//! ## Overview
//!
//! tinychat can be used in two ways:
//!
//! 1. **As a standalone chatbot** - Run the `tinychat` binary
//! 2. **As a library** - Reuse the memory, session and backends
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use tinychat::{ChatSession, GenerationParams, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::Ollama {
//!         base_url: "http://localhost:11434".to_string(),
//!         model: "llama3.2:3b".to_string(),
//!         kind: None,
//!     };
//!
//!     let service = provider.create_service().await?;
//!     let mut session = ChatSession::new(service, GenerationParams::default(), 4);
//!
//!     let reply = session.turn("Hello there!").await?;
//!     println!("{}", reply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Memory Only
//!
//! ```rust
//! use tinychat::ConversationMemory;
//!
//! let mut memory = ConversationMemory::new(4);
//! memory.add_user("hi");
//! memory.add_bot("hello");
//!
//! let prompt = memory.build_prompt("how are you");
//! assert!(prompt.ends_with("User: how are you\nAssistant:"));
//! ```
//!
//! ## Modules
//!
//! - [`memory`] - Sliding-window conversation memory and prompt rendering
//! - [`llm`] - Generation service trait and runtime clients
//! - [`chat`] - Command parsing and conversation turns
//! - [`cli`] - Argument parsing, colored output, interactive loop
//! - [`utils`] - Configuration loading
//! - [`types`] - Messages, roles and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Chat session and interactive commands.
pub mod chat;
/// Command-line interface.
pub mod cli;
/// Generation service clients and abstractions.
pub mod llm;
/// Sliding-window conversation memory.
pub mod memory;
/// Core types (messages, roles, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use chat::{ChatSession, Command, Outcome};
pub use llm::{clean_reply, GenerationParams, GenerationService, ModelKind, Provider};
pub use memory::ConversationMemory;
pub use types::{AppError, Message, Result, Role};
pub use utils::config::ChatConfig;
