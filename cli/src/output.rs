//! Styled terminal output.

use console::{Term, style};
use std::fmt::Display;

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(style("✓").green().bold(), message);
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(style("✗").red().bold(), message);
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        self.line(style("ℹ").blue().bold(), message);
    }

    fn line(&self, icon: impl Display, message: impl Display) {
        drop(self.term.write_line(&format!("{icon} {message}")));
    }
}
