use std::fmt;

// ============= Conversation Types =============

/// Who produced a message in the conversation.
///
/// The chatbot itself only ever stores `User` and `Bot`; `System` and
/// `Other` exist so callers can tag extra lines (tool output, narrators)
/// without changing the prompt format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
    System,
    Other(String),
}

impl Role {
    /// The label rendered in front of the message text in a prompt.
    pub fn label(&self) -> &str {
        match self {
            Role::User => "User",
            Role::Bot => "Bot",
            Role::System => "System",
            Role::Other(label) => label,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        match label {
            "User" => Role::User,
            "Bot" => Role::Bot,
            "System" => Role::System,
            other => Role::Other(other.to_string()),
        }
    }
}

/// A single role-tagged line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: impl Into<Role>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text)
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::utils::config::ConfigError> for AppError {
    fn from(err: crate::utils::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
