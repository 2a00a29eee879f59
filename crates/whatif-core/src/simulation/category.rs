//! Decision category detection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad kind of life decision, detected by keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    #[default]
    CareerRelocation,
    Education,
    Entrepreneurship,
    Relationship,
}

impl DecisionCategory {
    /// Checked in order; the first category with a matching keyword wins
    const KEYWORDS: [(DecisionCategory, &'static [&'static str]); 4] = [
        (Self::CareerRelocation, &["move", "relocate", "city", "country"]),
        (Self::Education, &["study", "degree", "university", "college"]),
        (Self::Entrepreneurship, &["start", "business", "company", "startup"]),
        (Self::Relationship, &["marry", "relationship", "divorce", "date"]),
    ];

    /// Detect the category of `decision`, defaulting to career relocation
    pub fn detect(decision: &str) -> Self {
        let lower = decision.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(category, _)| *category)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CareerRelocation => "career_relocation",
            Self::Education => "education_choices",
            Self::Entrepreneurship => "entrepreneurship",
            Self::Relationship => "relationship_decisions",
        }
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_categories() {
        assert_eq!(DecisionCategory::detect("Move to Tokyo"), DecisionCategory::CareerRelocation);
        assert_eq!(DecisionCategory::detect("get a law degree"), DecisionCategory::Education);
        assert_eq!(DecisionCategory::detect("open a bakery business"), DecisionCategory::Entrepreneurship);
        assert_eq!(DecisionCategory::detect("Marry my partner"), DecisionCategory::Relationship);
        assert_eq!(DecisionCategory::detect("adopt a cat"), DecisionCategory::CareerRelocation);
    }

    #[test]
    fn test_first_match_wins() {
        // "move" is checked before "university"
        assert_eq!(
            DecisionCategory::detect("move abroad for university"),
            DecisionCategory::CareerRelocation
        );
    }
}
