//! Inbound request types

use crate::error::{WhatIfError, WhatIfResult};
use crate::mode::SimulationMode;
use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

/// What is being generated: the decision, which branch, and the prompt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub decision: String,
    /// Zero-based branch index
    pub branch_index: usize,
    pub total_branches: usize,
    /// Fully rendered prompt sent to providers
    pub prompt: String,
}

impl PromptContext {
    pub fn new(
        decision: impl Into<String>,
        branch_index: usize,
        total_branches: usize,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            decision: decision.into(),
            branch_index,
            total_branches,
            prompt: prompt.into(),
        }
    }
}

/// Caller hints for chain ordering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPreferences {
    /// Model ids to try first, in order
    #[serde(default)]
    pub models: Vec<String>,
    /// Provider kinds to try first, in order, after `models`
    #[serde(default)]
    pub providers: Vec<ProviderKind>,
    /// Only try the preferred links
    #[serde(default)]
    pub exclusive: bool,
}

impl ModelPreferences {
    pub fn providers(providers: impl IntoIterator<Item = ProviderKind>) -> Self {
        Self {
            providers: providers.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.providers.is_empty()
    }
}

/// A single generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub context: PromptContext,
    pub mode: SimulationMode,
    #[serde(default)]
    pub preferences: ModelPreferences,
}

impl GenerationRequest {
    pub fn new(context: PromptContext, mode: SimulationMode) -> Self {
        Self {
            context,
            mode,
            preferences: ModelPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: ModelPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Reject requests that are not well-formed
    pub fn validate(&self) -> WhatIfResult<()> {
        if self.context.prompt.trim().is_empty() {
            return Err(WhatIfError::invalid_field("prompt", "Prompt must not be empty"));
        }
        if self.context.total_branches == 0 || self.context.branch_index >= self.context.total_branches {
            return Err(WhatIfError::invalid_field(
                "branch_index",
                format!(
                    "Branch {} out of range for {} branch(es)",
                    self.context.branch_index, self.context.total_branches
                ),
            ));
        }
        Ok(())
    }
}
