//! Chat session: one conversation against one generation service.
//!
//! The session owns its [`ConversationMemory`] and its service handle for the
//! whole conversation. Turns run strictly one after another; nothing here is
//! shared between threads.

use crate::llm::{GenerationParams, GenerationService};
use crate::memory::ConversationMemory;
use crate::types::Result;
use tracing::debug;

/// Help text listing the interactive commands.
pub const HELP_TEXT: &str = "Commands: /exit (quit), /reset (clear memory), /help (this message)";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input
    Empty,
    /// `/exit`
    Exit,
    /// `/reset`
    Reset,
    /// `/help`
    Help,
    /// Anything else, trimmed
    Message(String),
}

impl Command {
    /// Parse a raw input line. Commands are matched case-insensitively.
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            return Command::Empty;
        }

        match text.to_lowercase().as_str() {
            "/exit" => Command::Exit,
            "/reset" => Command::Reset,
            "/help" => Command::Help,
            _ => Command::Message(text.to_string()),
        }
    }
}

/// What the caller should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing happened; read the next line
    Ignored,
    /// Memory was cleared
    Reset,
    /// Show [`HELP_TEXT`]
    Help,
    /// End the session
    Exit,
    /// The bot's post-processed reply
    Reply(String),
}

pub struct ChatSession<G: GenerationService> {
    service: G,
    params: GenerationParams,
    memory: ConversationMemory,
}

impl<G: GenerationService> ChatSession<G> {
    pub fn new(service: G, params: GenerationParams, max_turns: usize) -> Self {
        Self {
            service,
            params,
            memory: ConversationMemory::new(max_turns),
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn service(&self) -> &G {
        &self.service
    }

    /// Handle one line of user input.
    pub async fn handle_line(&mut self, line: &str) -> Result<Outcome> {
        match Command::parse(line) {
            Command::Empty => Ok(Outcome::Ignored),
            Command::Exit => Ok(Outcome::Exit),
            Command::Help => Ok(Outcome::Help),
            Command::Reset => {
                self.memory.clear();
                debug!("Memory cleared");
                Ok(Outcome::Reset)
            }
            Command::Message(text) => self.turn(&text).await.map(Outcome::Reply),
        }
    }

    /// Run a full conversation turn and return the bot's reply.
    ///
    /// The user message is stored before the prompt is built, so it shows up
    /// in the history section as well as on the final `User:` line. If
    /// generation fails the error is returned and no bot reply is stored.
    pub async fn turn(&mut self, user_text: &str) -> Result<String> {
        self.memory.add_user(user_text);
        let prompt = self.memory.build_prompt(user_text);
        debug!(history = self.memory.len(), prompt = %prompt, "Built prompt");

        let raw = self.service.generate(&prompt, &self.params).await?;
        let reply = self.service.model_kind().clean_reply(&raw);
        debug!(raw_len = raw.len(), reply_len = reply.len(), "Generated reply");

        self.memory.add_bot(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ModelKind;
    use crate::types::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoService {
        reply: String,
        kind: ModelKind,
        prompts: Mutex<Vec<String>>,
    }

    impl EchoService {
        fn new(reply: &str, kind: ModelKind) -> Self {
            Self {
                reply: reply.to_string(),
                kind,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationService for EchoService {
        async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.reply == "<fail>" {
                return Err(AppError::Llm("out of memory".to_string()));
            }
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "echo"
        }

        fn model_kind(&self) -> ModelKind {
            self.kind
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   \t"), Command::Empty);
        assert_eq!(Command::parse("/exit"), Command::Exit);
        assert_eq!(Command::parse("/EXIT"), Command::Exit);
        assert_eq!(Command::parse("  /Reset "), Command::Reset);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(
            Command::parse("  hello there \n"),
            Command::Message("hello there".to_string())
        );
        assert_eq!(
            Command::parse("/unknown"),
            Command::Message("/unknown".to_string())
        );
    }

    #[tokio::test]
    async fn test_turn_stores_user_then_bot() {
        let service = EchoService::new(" Hi! ", ModelKind::CausalLm);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);

        let reply = session.turn("hello").await.unwrap();
        assert_eq!(reply, "Hi!");

        let messages = session.memory().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].to_string(), "User: hello");
        assert_eq!(messages[1].to_string(), "Bot: Hi!");
    }

    #[tokio::test]
    async fn test_prompt_contains_new_message_twice() {
        let service = EchoService::new("ok", ModelKind::CausalLm);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);
        session.turn("hello").await.unwrap();

        let prompts = session.service().prompts.lock().unwrap();
        assert_eq!(
            prompts[0],
            "You are a helpful assistant. Answer briefly and clearly.\n\
             Use the recent conversation to stay on topic.\n\n\
             Conversation so far:\nUser: hello\n\n\
             User: hello\nAssistant:"
        );
    }

    #[tokio::test]
    async fn test_causal_reply_cut_at_user_tag() {
        let service = EchoService::new("Fine thanks. User: and you?", ModelKind::CausalLm);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);
        assert_eq!(session.turn("how are you").await.unwrap(), "Fine thanks.");
    }

    #[tokio::test]
    async fn test_seq2seq_reply_only_trimmed() {
        let service = EchoService::new(" Fine thanks. User: and you? ", ModelKind::Seq2Seq);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);
        assert_eq!(
            session.turn("how are you").await.unwrap(),
            "Fine thanks. User: and you?"
        );
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_user_message_only() {
        let service = EchoService::new("<fail>", ModelKind::CausalLm);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);

        let result = session.turn("hello").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
        assert_eq!(session.memory().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_line_commands() {
        let service = EchoService::new("ok", ModelKind::CausalLm);
        let mut session = ChatSession::new(service, GenerationParams::default(), 4);

        assert_eq!(session.handle_line("").await.unwrap(), Outcome::Ignored);
        assert!(session.memory().is_empty());

        assert_eq!(
            session.handle_line("hi").await.unwrap(),
            Outcome::Reply("ok".to_string())
        );
        assert_eq!(session.memory().len(), 2);

        assert_eq!(session.handle_line("/reset").await.unwrap(), Outcome::Reset);
        assert!(session.memory().is_empty());
        assert_eq!(session.memory().max_turns(), 4);

        assert_eq!(session.handle_line("/help").await.unwrap(), Outcome::Help);
        assert_eq!(session.handle_line("/exit").await.unwrap(), Outcome::Exit);
        assert!(session.service().prompts.lock().unwrap().len() == 1);
    }
}
