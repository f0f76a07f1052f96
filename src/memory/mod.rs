//! Sliding-window conversation memory.
//!
//! This module provides:
//! - A bounded, ordered log of role-tagged messages
//! - Prompt rendering from that log plus the newest user message
//!
//! Capacity is configured in turns (one user message plus one bot reply) but
//! enforced in messages, so a window of `N` turns retains at most `2 * N`
//! messages. Nothing is persisted; the memory lives as long as the session.

use crate::types::{Message, Role};
use std::collections::VecDeque;

/// Default number of recent turns to remember.
pub const DEFAULT_WINDOW_TURNS: usize = 4;

/// Instructions placed at the top of every prompt.
pub const SYSTEM_PREAMBLE: &str = "You are a helpful assistant. Answer briefly and clearly.\n\
                                   Use the recent conversation to stay on topic.";

/// Label introducing the stored history inside a prompt.
pub const HISTORY_LABEL: &str = "Conversation so far:";

/// Marker the prompt ends with; the model continues from here.
pub const ASSISTANT_MARKER: &str = "Assistant:";

/// A fixed-size FIFO window over the most recent messages of a conversation.
///
/// # Example
/// ```
/// use tinychat::memory::ConversationMemory;
///
/// let mut memory = ConversationMemory::new(1);
/// memory.add_user("hi");
/// memory.add_bot("hello");
/// memory.add_user("still there?");
///
/// // One turn of capacity keeps only the last two messages.
/// assert_eq!(memory.len(), 2);
/// assert_eq!(memory.messages()[0].text, "hello");
/// ```
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    max_turns: usize,
    messages: VecDeque<Message>,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_TURNS)
    }
}

impl ConversationMemory {
    /// Create an empty memory that remembers the last `max_turns` turns.
    ///
    /// `max_turns = 0` is allowed and yields a memory that never retains
    /// anything.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns,
            messages: VecDeque::with_capacity(max_turns.saturating_mul(2)),
        }
    }

    /// The configured window size, in turns.
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// The maximum number of messages retained.
    pub fn capacity(&self) -> usize {
        self.max_turns.saturating_mul(2)
    }

    /// Append a message, then evict the oldest entries beyond capacity.
    pub fn add(&mut self, role: impl Into<Role>, text: impl Into<String>) {
        self.messages.push_back(Message::new(role, text));
        self.trim_to_capacity();
    }

    pub fn add_user(&mut self, text: impl Into<String>) {
        self.add(Role::User, text);
    }

    pub fn add_bot(&mut self, text: impl Into<String>) {
        self.add(Role::Bot, text);
    }

    /// Render the prompt for the next generation call.
    ///
    /// The layout is the preamble, a blank line, the stored history (when
    /// there is any) under [`HISTORY_LABEL`] followed by a blank line, the
    /// `User:` line for `new_user_message`, and finally [`ASSISTANT_MARKER`]
    /// with no trailing newline.
    ///
    /// `new_user_message` is not stored. Callers that store it first (as the
    /// chat session does) will see it both in the history and on the last
    /// `User:` line.
    pub fn build_prompt(&self, new_user_message: &str) -> String {
        let mut prompt = String::with_capacity(256);
        prompt.push_str(SYSTEM_PREAMBLE);
        prompt.push_str("\n\n");

        if !self.messages.is_empty() {
            let history = self
                .messages
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            prompt.push_str(HISTORY_LABEL);
            prompt.push('\n');
            prompt.push_str(&history);
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!("{}: {}\n", Role::User, new_user_message));
        prompt.push_str(ASSISTANT_MARKER);
        prompt
    }

    /// Forget every stored message. The window size is unchanged.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Snapshot of the stored messages, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn trim_to_capacity(&mut self) {
        let capacity = self.capacity();
        while self.messages.len() > capacity {
            self.messages.pop_front();
        }
    }
}
