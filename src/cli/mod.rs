//! CLI module for tinychat
//!
//! Provides command-line interface parsing and the interactive chat loop.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;
pub mod repl;

use crate::llm::ModelKind;
use crate::utils::config::{ChatConfig, ProviderKind};
use clap::Parser;
use std::path::PathBuf;

/// tinychat - a tiny local CLI chatbot
///
/// Remembers the last few turns of the conversation and sends them, with your
/// newest message, to a local model server.
#[derive(Parser, Debug)]
#[command(
    name = "tinychat",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "tinychat - a tiny local CLI chatbot with sliding-window memory",
    long_about = "A tiny local CLI chatbot. Keeps a sliding window of recent turns and\n\
                  asks a model served by Ollama or an OpenAI-compatible server for replies.\n\n\
                  While chatting, type /reset to clear memory, /help for help, /exit to quit.",
    after_help = "EXAMPLES:\n    \
                  tinychat                               # Chat with llama3.2:3b on local Ollama\n    \
                  tinychat --model flan-t5 --window 2    # Smaller memory, another model\n    \
                  tinychat --provider openai --base-url http://localhost:8080/v1\n    \
                  tinychat --config my.toml              # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to tinychat.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model name/identifier (default: llama3.2:3b)
    #[arg(short, long, env = "TINYCHAT_MODEL")]
    pub model: Option<String>,

    /// Model server type (default: ollama)
    #[arg(long, value_enum, env = "TINYCHAT_PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Model server address
    #[arg(long, env = "TINYCHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Force the model kind (seq2seq or causal) instead of detecting it
    #[arg(long, value_name = "KIND")]
    pub model_kind: Option<ModelKind>,

    /// How many recent turns to remember (default: 4)
    #[arg(short, long, env = "TINYCHAT_WINDOW")]
    pub window: Option<usize>,

    /// Max new tokens to generate (default: 128)
    #[arg(long, env = "TINYCHAT_MAX_NEW_TOKENS")]
    pub max_new_tokens: Option<u32>,

    /// Sampling temperature (default: 0.7)
    #[arg(long, env = "TINYCHAT_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Top-p nucleus sampling (default: 0.95)
    #[arg(long, env = "TINYCHAT_TOP_P")]
    pub top_p: Option<f32>,

    /// Try to use GPU (if available)
    #[arg(long, env = "TINYCHAT_USE_GPU")]
    pub use_gpu: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Overlay the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut ChatConfig) {
        if let Some(ref model) = self.model {
            config.model.name = model.clone();
        }
        if let Some(provider) = self.provider {
            config.model.provider = provider;
        }
        if let Some(ref base_url) = self.base_url {
            config.model.base_url = Some(base_url.clone());
        }
        if let Some(kind) = self.model_kind {
            config.model.kind = Some(kind);
        }
        if let Some(window) = self.window {
            config.memory.window = window;
        }
        if let Some(max_new_tokens) = self.max_new_tokens {
            config.generation.max_new_tokens = max_new_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.generation.temperature = temperature;
        }
        if let Some(top_p) = self.top_p {
            config.generation.top_p = top_p;
        }
        if self.use_gpu {
            config.generation.use_gpu = true;
        }
    }
}
