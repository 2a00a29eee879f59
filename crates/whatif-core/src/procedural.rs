//! Local procedural narrative generator
//!
//! Pure and deterministic: the same context and mode always produce the same
//! payload, and every output passes `NarrativePayload::validate`.

use crate::gateway::PromptContext;
use crate::mode::SimulationMode;
use crate::narrative::{NarrativePayload, TimelineEvent};
use sha2::{Digest, Sha256};

struct Template {
    title: &'static str,
    story: fn(&str) -> String,
    timeline: [&'static str; 3],
    key_events: [&'static str; 3],
    probability: f64,
}

const TIMELINE_YEARS: [&str; 3] = ["Year 1", "Year 3", "Year 5"];

static TEMPLATES: [Template; 4] = [
    Template {
        title: "The Conventional Path",
        story: |d| {
            format!(
                "You decided to {d}. Things progressed as most would expect: some challenges, \
                 some victories, but overall a steady journey. Life unfolds with familiar rhythms, \
                 bringing both comfort and occasional wonder about the roads not taken."
            )
        },
        timeline: [
            "Initial adjustment period with mixed results",
            "Established new routines and relationships",
            "Achieved moderate success and stability",
        ],
        key_events: ["Found your footing", "Built new connections", "Reached equilibrium"],
        probability: 0.7,
    },
    Template {
        title: "The Transformative Journey",
        story: |d| {
            format!(
                "Your choice to {d} catalyzed unexpected personal growth. Initial struggles gave \
                 way to profound discoveries about yourself. What seemed like a simple decision \
                 became a complete life transformation."
            )
        },
        timeline: [
            "Difficult start but important lessons learned",
            "Breakthrough moment changes everything",
            "Living a completely different life than imagined",
        ],
        key_events: ["Overcame major obstacle", "Discovered hidden talent", "Found true calling"],
        probability: 0.4,
    },
    Template {
        title: "The Serendipitous Adventure",
        story: |d| {
            format!(
                "After deciding to {d}, life took surprising turns. A chance encounter led to \
                 unexpected opportunities. Sometimes the best outcomes come from the most \
                 unlikely circumstances."
            )
        },
        timeline: [
            "Random encounter changes trajectory",
            "Pursuing opportunity you never expected",
            "Success in an entirely different field",
        ],
        key_events: ["Met future mentor", "Pivoted to new path", "Achieved unexpected success"],
        probability: 0.3,
    },
    Template {
        title: "The Wild Card Timeline",
        story: |d| {
            format!(
                "Your decision to {d} triggered a cascade of improbable events. Against all odds, \
                 you found yourself in situations that defy conventional wisdom. Life became \
                 stranger than fiction."
            )
        },
        timeline: [
            "Bizarre coincidence alters course",
            "Became involved in something extraordinary",
            "Living a life no one could have predicted",
        ],
        key_events: ["Won unlikely lottery", "Became accidental celebrity", "Changed the world"],
        probability: 0.1,
    },
];

/// Generate a branch without any network I/O
pub fn generate(context: &PromptContext, mode: SimulationMode) -> NarrativePayload {
    let template = &TEMPLATES[context.branch_index % TEMPLATES.len()];
    let decision = match context.decision.trim() {
        "" => "make a change",
        d => d,
    };

    let probability_score = match mode {
        SimulationMode::Realistic => template.probability,
        SimulationMode::Balanced => 0.5,
        SimulationMode::Random => unit_hash(&[
            "probability",
            decision,
            &context.branch_index.to_string(),
        ]),
    };

    NarrativePayload {
        title: template.title.to_string(),
        story: (template.story)(decision),
        timeline: TIMELINE_YEARS
            .iter()
            .zip(template.timeline)
            .map(|(year, event)| TimelineEvent::new(*year, event))
            .collect(),
        key_events: template.key_events.iter().map(|e| e.to_string()).collect(),
        probability_score,
    }
}

/// Deterministic value in [0, 1) derived from `parts`
pub(crate) fn unit_hash(parts: &[&str]) -> f64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    // 53 high bits give a uniformly spaced f64 in [0, 1)
    (u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(branch_index: usize) -> PromptContext {
        PromptContext::new("move to Paris", branch_index, 4, "prompt")
    }

    #[test]
    fn test_templates_cycle_by_branch() {
        let titles: Vec<_> = (0..5)
            .map(|i| generate(&context(i), SimulationMode::Realistic).title)
            .collect();
        assert_eq!(titles[0], "The Conventional Path");
        assert_eq!(titles[3], "The Wild Card Timeline");
        assert_eq!(titles[4], titles[0]);
    }

    #[test]
    fn test_every_output_is_valid() {
        for mode in SimulationMode::ALL {
            for branch in 0..8 {
                let payload = generate(&context(branch), mode);
                assert!(payload.validate().is_ok(), "{:?} branch {}", mode, branch);
                assert_eq!(payload.timeline.len(), 3);
                assert_eq!(payload.key_events.len(), 3);
            }
        }
    }

    #[test]
    fn test_decision_in_story() {
        let payload = generate(&context(0), SimulationMode::Realistic);
        assert!(payload.story.starts_with("You decided to move to Paris."));

        let empty = PromptContext::new("   ", 1, 2, "prompt");
        assert!(generate(&empty, SimulationMode::Realistic).story.contains("make a change"));
    }

    #[test]
    fn test_probability_by_mode() {
        assert_eq!(generate(&context(1), SimulationMode::Realistic).probability_score, 0.4);
        assert_eq!(generate(&context(1), SimulationMode::Balanced).probability_score, 0.5);

        let a = generate(&context(1), SimulationMode::Random).probability_score;
        let b = generate(&context(1), SimulationMode::Random).probability_score;
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a));
    }

    #[test]
    fn test_unit_hash_range_and_spread() {
        let values: Vec<f64> = (0..100).map(|i| unit_hash(&["x", &i.to_string()])).collect();
        assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
        assert!(values.iter().any(|v| *v < 0.5));
        assert!(values.iter().any(|v| *v >= 0.5));
    }
}
