//! Branch prompt construction

use super::category::DecisionCategory;
use crate::mode::SimulationMode;
use serde::{Deserialize, Serialize};

/// Age assumed when the user does not give one
pub const DEFAULT_AGE: u32 = 30;

const BRANCH_THEMES: [&str; 4] = [
    "The expected path",
    "The challenging but rewarding path",
    "The unexpected twist path",
    "The wildcard path",
];

/// Facts about the person making the decision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    pub age: Option<u32>,
    pub traits: Vec<String>,
    pub location: Option<String>,
}

impl UserContext {
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_trait(mut self, personality_trait: impl Into<String>) -> Self {
        self.traits.push(personality_trait.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Append an "Additional context" section to `prompt`
    pub fn enhance(&self, prompt: &str) -> String {
        let mut lines = vec![format!(
            "Assume the person is currently {} years old.",
            self.age.unwrap_or(DEFAULT_AGE)
        )];
        if !self.traits.is_empty() {
            lines.push(format!("Consider these personality traits: {}", self.traits.join(", ")));
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            lines.push(format!("Current location: {}", location));
        }
        format!("{}\n\nAdditional context:\n{}", prompt, lines.join("\n"))
    }
}

/// Build the provider prompt for one branch, enriched with `user` when given
pub fn build_prompt(
    decision: &str,
    mode: SimulationMode,
    category: DecisionCategory,
    branch_index: usize,
    total_branches: usize,
    user: Option<&UserContext>,
) -> String {
    let theme = BRANCH_THEMES[branch_index % BRANCH_THEMES.len()];
    let prompt = format!(
        r#"Generate alternative life path #{branch} of {total} for this decision:
"{decision}"

Mode: {mode} - {instruction}
Decision category: {category}
Theme for this branch: {theme}

Create a unique branch that differs significantly from the other branches.

Return JSON with this structure:
{{
    "title": "Brief branch title (5-7 words)",
    "story": "Narrative description of this life path (150-200 words)",
    "timeline": [
        {{"year": "Year 1", "event": "What happens"}},
        {{"year": "Year 3", "event": "Major milestone"}},
        {{"year": "Year 5", "event": "Outcome"}}
    ],
    "key_events": ["Event 1", "Event 2", "Event 3"],
    "probability_score": 0.0-1.0 based on likelihood
}}"#,
        branch = branch_index + 1,
        total = total_branches,
        instruction = mode.instruction(),
    );
    match user {
        Some(user) => user.enhance(&prompt),
        None => prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_branch_and_mode() {
        let prompt = build_prompt(
            "learn to sail",
            SimulationMode::Random,
            DecisionCategory::CareerRelocation,
            2,
            4,
            None,
        );
        assert!(prompt.contains("#3 of 4"));
        assert!(prompt.contains("\"learn to sail\""));
        assert!(prompt.contains(SimulationMode::Random.instruction()));
        assert!(prompt.contains("The unexpected twist path"));
        assert!(prompt.contains("\"key_events\""));
    }

    #[test]
    fn test_branches_get_distinct_prompts() {
        let a = build_prompt("x", SimulationMode::Realistic, DecisionCategory::Education, 0, 2, None);
        let b = build_prompt("x", SimulationMode::Realistic, DecisionCategory::Education, 1, 2, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_context_appended() {
        let user = UserContext::default()
            .with_age(25)
            .with_trait("adventurous")
            .with_trait("patient")
            .with_location("New York");
        let prompt = build_prompt(
            "open a cafe",
            SimulationMode::Realistic,
            DecisionCategory::Entrepreneurship,
            0,
            4,
            Some(&user),
        );
        assert!(prompt.contains("Additional context:"));
        assert!(prompt.contains("Assume the person is currently 25 years old."));
        assert!(prompt.contains("Consider these personality traits: adventurous, patient"));
        assert!(prompt.ends_with("Current location: New York"));
    }

    #[test]
    fn test_empty_user_context_assumes_default_age() {
        let enhanced = UserContext::default().enhance("base");
        assert_eq!(enhanced, "base\n\nAdditional context:\nAssume the person is currently 30 years old.");

        let plain = build_prompt("x", SimulationMode::Realistic, DecisionCategory::Education, 0, 1, None);
        assert!(!plain.contains("Additional context"));
    }
}
