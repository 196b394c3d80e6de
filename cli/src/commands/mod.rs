//! Subcommand implementations.

pub mod completions;
pub mod post;

pub use completions::generate_completions;
pub use post::run_post;
