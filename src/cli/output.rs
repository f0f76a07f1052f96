//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the chat loop.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};

/// Farewell line printed however the session ends.
pub const FAREWELL: &str = "Exiting chatbot. Goodbye!";

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Colors unless disabled or stdout is not a terminal
    pub fn for_terminal(no_color: bool) -> Self {
        if no_color || !io::stdout().is_terminal() {
            Self::no_color()
        } else {
            Self::new()
        }
    }

    /// Print the greeting shown when the session starts
    pub fn greeting(&self) {
        if self.colored {
            println!("{}", "👋 Hello! I'm your local CLI chatbot.".bright_white().bold());
            println!(
                "{} {}",
                "Type anything to chat.".dimmed(),
                "Commands: /exit, /reset, /help".cyan()
            );
        } else {
            println!("Hello! I'm your local CLI chatbot.");
            println!("Type anything to chat. Commands: /exit, /reset, /help");
        }
    }

    /// Print the input prompt and flush so it shows before reading
    pub fn prompt(&self) {
        if self.colored {
            print!("\n{} ", "You:".bright_green().bold());
        } else {
            print!("\nYou: ");
        }
        io::stdout().flush().ok();
    }

    /// Print a bot reply
    pub fn bot(&self, reply: &str) {
        if self.colored {
            println!("{} {}", "Bot:".bright_cyan().bold(), reply);
        } else {
            println!("Bot: {}", reply);
        }
    }

    /// Print the farewell line
    pub fn farewell(&self) {
        if self.colored {
            println!("{}", FAREWELL.dimmed());
        } else {
            println!("{}", FAREWELL);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("{}", message.green());
        } else {
            println!("{}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("{}", message.blue());
        } else {
            println!("{}", message);
        }
    }

    /// Print a fatal error to stderr
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("{}: {}", key.cyan().bold(), value);
        } else {
            println!("{}: {}", key, value);
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
