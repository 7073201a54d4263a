//! CLI module for gpt-dir
//!
//! Provides the REPL that performs every effect the conversation state
//! machine asks for: prompting, cost confirmation, the streaming request,
//! and the per-turn cost report.

mod repl;

pub use repl::{Repl, ReplError, ReplOptions};
