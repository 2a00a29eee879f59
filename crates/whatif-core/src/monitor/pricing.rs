//! Token and cost estimation

use serde::{Deserialize, Serialize};

/// Characters per token used by the length heuristic
const CHARS_PER_TOKEN: usize = 4;

/// Estimate tokens as ceil(chars / 4)
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count().div_ceil(CHARS_PER_TOKEN) as u64
}

/// Cost in USD for `tokens` at `price_per_1k` per thousand tokens
pub fn estimate_cost(tokens: u64, price_per_1k: f64) -> f64 {
    tokens as f64 / 1000.0 * price_per_1k
}

/// Token counts for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// True when either count came from the length heuristic
    pub estimated: bool,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            estimated: false,
        }
    }

    /// Use provider-reported counts where present, else estimate from text
    pub fn resolve(
        reported_input: Option<u64>,
        reported_output: Option<u64>,
        prompt: &str,
        output: &str,
    ) -> Self {
        Self {
            input_tokens: reported_input.unwrap_or_else(|| estimate_tokens(prompt)),
            output_tokens: reported_output.unwrap_or_else(|| estimate_tokens(output)),
            estimated: reported_input.is_none() || reported_output.is_none(),
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn cost(&self, price_per_1k: f64) -> f64 {
        estimate_cost(self.total(), price_per_1k)
    }
}
