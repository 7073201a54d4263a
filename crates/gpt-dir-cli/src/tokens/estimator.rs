//! Cost estimation: token count × per-1k price.

use super::counter::{TokenCounter, TokenCounterError};
use super::pricing::ModelPricing;

/// Token count and monetary cost of a piece of text. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub tokens: usize,
    pub cost: f64,
}

/// Estimates costs for one model's pricing.
pub struct CostEstimator {
    counter: TokenCounter,
    pricing: ModelPricing,
}

impl CostEstimator {
    pub fn new(pricing: ModelPricing) -> Result<Self, TokenCounterError> {
        Ok(Self {
            counter: TokenCounter::new()?,
            pricing,
        })
    }

    /// Estimate the cost of sending `text` as input.
    pub fn input_estimate(&self, text: &str) -> CostEstimate {
        self.estimate(text, self.pricing.input_per_1k)
    }

    /// Estimate the cost of `text` as generated output.
    pub fn output_estimate(&self, text: &str) -> CostEstimate {
        self.estimate(text, self.pricing.output_per_1k)
    }

    fn estimate(&self, text: &str, price_per_1k: f64) -> CostEstimate {
        let tokens = self.counter.count(text);
        CostEstimate {
            tokens,
            cost: tokens as f64 / 1000.0 * price_per_1k,
        }
    }
}
