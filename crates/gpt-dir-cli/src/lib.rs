//! gpt-dir CLI library
//!
//! This library provides the user-facing half of gpt-dir: argument handling,
//! the file-context loader, token counting and cost estimation, and the REPL
//! that drives the conversation state machine from `gpt-dir-core`.

pub mod cli;
pub mod context;
pub mod tokens;

pub use cli::{Repl, ReplError, ReplOptions};
pub use context::ContextError;
pub use tokens::{CostEstimate, CostEstimator, ModelPricing, PricingError, PricingTable, TokenCounter};
