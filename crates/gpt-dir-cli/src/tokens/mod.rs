//! Token counting and cost estimation.
//!
//! Counts tokens with the same byte-pair encoding the provider bills with
//! (cl100k_base) and turns counts into money using per-1k-token prices.

mod counter;
mod estimator;
mod pricing;

pub use counter::{TokenCounter, TokenCounterError};
pub use estimator::{CostEstimate, CostEstimator};
pub use pricing::{ModelPricing, PricingError, PricingTable};
