//! Simulation engine

use super::category::DecisionCategory;
use super::prompt::{build_prompt, UserContext};
use super::sanitize::{check_content_safety, sanitize_decision, sanitize_output};
use super::scoring::fate_score;
use crate::error::{WhatIfError, WhatIfResult};
use crate::gateway::{GenerationRequest, ModelPreferences, PromptContext, ProviderGateway};
use crate::mode::SimulationMode;
use crate::narrative::{GeneratedNarrative, PayloadSource, TimelineEvent};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const DEFAULT_BRANCHES: usize = 4;
pub const MAX_BRANCHES: usize = 8;

/// Fate score given to placeholder branches
const SAFE_FATE_SCORE: u8 = 70;

/// One scored life path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeBranch {
    pub branch_id: usize,
    pub title: String,
    pub story: String,
    pub timeline: Vec<TimelineEvent>,
    pub key_events: Vec<String>,
    pub probability_score: f64,
    pub fate_score: u8,
    pub source: PayloadSource,
    pub provider: Option<String>,
}

/// A complete simulation run
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub id: Uuid,
    /// Sanitized decision text
    pub decision: String,
    pub mode: SimulationMode,
    pub category: DecisionCategory,
    pub branches: Vec<LifeBranch>,
    pub created_at: DateTime<Utc>,
}

impl Simulation {
    /// Number of branches produced by the given source
    pub fn count_from(&self, source: PayloadSource) -> usize {
        self.branches.iter().filter(|b| b.source == source).count()
    }
}

/// Runs simulations against a shared gateway
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    gateway: Arc<ProviderGateway>,
    preferences: ModelPreferences,
    user: Option<UserContext>,
    sanitize_outputs: bool,
}

impl SimulationEngine {
    pub fn new(gateway: Arc<ProviderGateway>) -> Self {
        Self {
            gateway,
            preferences: ModelPreferences::default(),
            user: None,
            sanitize_outputs: true,
        }
    }

    /// Apply model preferences to every branch request
    pub fn with_preferences(mut self, preferences: ModelPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Describe the person deciding in every branch prompt
    pub fn with_user_context(mut self, user: UserContext) -> Self {
        self.user = Some(user);
        self
    }

    /// Toggle HTML sanitizing of generated titles, stories and events (on by default)
    pub fn with_output_sanitizing(mut self, enabled: bool) -> Self {
        self.sanitize_outputs = enabled;
        self
    }

    pub fn gateway(&self) -> &Arc<ProviderGateway> {
        &self.gateway
    }

    /// Simulate `branches` alternative outcomes of `decision`
    ///
    /// Branch requests run concurrently through the gateway. Decisions that
    /// fail the safety gate yield placeholder branches without any provider
    /// call.
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::InvalidInput` for an empty decision or a branch
    /// count outside `1..=MAX_BRANCHES`, and any gateway error when
    /// procedural fallback is disabled.
    #[instrument(skip(self, decision))]
    pub async fn simulate(
        &self,
        decision: &str,
        mode: SimulationMode,
        branches: usize,
    ) -> WhatIfResult<Simulation> {
        if branches == 0 || branches > MAX_BRANCHES {
            return Err(WhatIfError::invalid_field(
                "branches",
                format!("Branch count must be between 1 and {}, got {}", MAX_BRANCHES, branches),
            ));
        }
        let decision = sanitize_decision(decision);
        if decision.is_empty() {
            return Err(WhatIfError::invalid_field("decision", "Decision must not be empty"));
        }
        let category = DecisionCategory::detect(&decision);

        let branches = if let Some(reason) = check_content_safety(&decision) {
            warn!("Decision blocked by safety gate: {}", reason);
            safe_branches(branches)
        } else {
            self.generate_branches(&decision, mode, category, branches)
                .await?
        };

        info!(branches = branches.len(), category = %category, "Simulation complete");
        Ok(Simulation {
            id: Uuid::new_v4(),
            decision,
            mode,
            category,
            branches,
            created_at: Utc::now(),
        })
    }

    async fn generate_branches(
        &self,
        decision: &str,
        mode: SimulationMode,
        category: DecisionCategory,
        total: usize,
    ) -> WhatIfResult<Vec<LifeBranch>> {
        let requests: Vec<GenerationRequest> = (0..total)
            .map(|index| {
                let prompt = build_prompt(decision, mode, category, index, total, self.user.as_ref());
                GenerationRequest::new(PromptContext::new(decision, index, total, prompt), mode)
                    .with_preferences(self.preferences.clone())
            })
            .collect();

        let results = join_all(requests.iter().map(|r| self.gateway.generate(r))).await;

        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result.map(|generated| score_branch(decision, mode, index, generated, self.sanitize_outputs))
            })
            .collect()
    }
}

fn score_branch(
    decision: &str,
    mode: SimulationMode,
    index: usize,
    generated: GeneratedNarrative,
    sanitize: bool,
) -> LifeBranch {
    let mut payload = generated.payload;
    if sanitize {
        payload.title = sanitize_output(&payload.title);
        payload.story = sanitize_output(&payload.story);
        for event in &mut payload.timeline {
            event.year = sanitize_output(&event.year);
            event.event = sanitize_output(&event.event);
        }
        for key_event in &mut payload.key_events {
            *key_event = sanitize_output(key_event);
        }
    }
    let branch = index.to_string();
    let fate_score = fate_score(&payload.key_events, mode, &["fate", decision, &branch]);
    LifeBranch {
        branch_id: index,
        title: payload.title,
        story: payload.story,
        timeline: payload.timeline,
        key_events: payload.key_events,
        probability_score: payload.probability_score,
        fate_score,
        source: generated.source,
        provider: generated.provider,
    }
}

fn safe_branches(count: usize) -> Vec<LifeBranch> {
    (0..count)
        .map(|index| LifeBranch {
            branch_id: index,
            title: format!("Path {}: A New Beginning", index + 1),
            story: "Every decision opens new doors. This path leads to personal growth and \
                    positive outcomes through dedication and perseverance."
                .to_string(),
            timeline: vec![
                TimelineEvent::new("Year 1", "Started fresh with new perspective"),
                TimelineEvent::new("Year 3", "Built meaningful connections"),
                TimelineEvent::new("Year 5", "Achieved personal milestone"),
            ],
            key_events: vec![
                "Fresh start".to_string(),
                "Personal growth".to_string(),
                "Positive outcome".to_string(),
            ],
            probability_score: 0.5,
            fate_score: SAFE_FATE_SCORE,
            source: PayloadSource::Procedural,
            provider: None,
        })
        .collect()
}
