//! Model pricing lookup.
//!
//! The table is an injected value rather than a hard-coded match, so new
//! models only need a new entry, not a code change. `builtin()` carries the
//! models the tool ships with.

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur during pricing operations.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Model has no pricing entry.
    #[error("unknown model: {0}")]
    UnknownModel(String),
}

/// Per-1000-token prices for one model, in USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Mapping from model identifier to its prices.
#[derive(Debug, Clone)]
pub struct PricingTable {
    entries: HashMap<String, ModelPricing>,
}

impl PricingTable {
    /// Build a table from arbitrary entries.
    pub fn new(entries: impl IntoIterator<Item = (String, ModelPricing)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The models the tool ships with. Prices are USD per 1000 tokens.
    pub fn builtin() -> Self {
        Self::new([
            (
                "3.5-turbo-1106".to_string(),
                ModelPricing {
                    input_per_1k: 0.0010,
                    output_per_1k: 0.0020,
                },
            ),
            (
                "4".to_string(),
                ModelPricing {
                    input_per_1k: 0.03,
                    output_per_1k: 0.06,
                },
            ),
            (
                "4-32k".to_string(),
                ModelPricing {
                    input_per_1k: 0.06,
                    output_per_1k: 0.12,
                },
            ),
            (
                "4-1106-preview".to_string(),
                ModelPricing {
                    input_per_1k: 0.01,
                    output_per_1k: 0.03,
                },
            ),
        ])
    }

    /// Look up prices for a model.
    pub fn get(&self, model: &str) -> Result<ModelPricing, PricingError> {
        self.entries
            .get(model)
            .copied()
            .ok_or_else(|| PricingError::UnknownModel(model.to_string()))
    }

    /// Known model identifiers, sorted for stable display.
    pub fn models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        models.sort_unstable();
        models
    }
}
