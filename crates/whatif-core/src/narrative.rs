//! Structured narrative payloads and response parsing
//!
//! Providers return free text. A response counts as a success only if it
//! contains a JSON object (code fences and surrounding prose are tolerated)
//! that deserializes and validates as a [`NarrativePayload`].

use crate::error::{WhatIfError, WhatIfResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// One milestone on a branch timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub event: String,
}

impl TimelineEvent {
    pub fn new(year: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            event: event.into(),
        }
    }
}

/// A generated life branch, before scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativePayload {
    pub title: String,
    pub story: String,
    pub timeline: Vec<TimelineEvent>,
    pub key_events: Vec<String>,
    #[serde(default = "default_probability")]
    pub probability_score: f64,
}

fn default_probability() -> f64 {
    0.5
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(format!("Year {}", n)),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

impl NarrativePayload {
    /// Check structural requirements
    ///
    /// # Errors
    ///
    /// Returns `WhatIfError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> WhatIfResult<()> {
        if self.title.trim().is_empty() {
            return Err(WhatIfError::invalid_field("title", "title is empty"));
        }
        if self.story.trim().is_empty() {
            return Err(WhatIfError::invalid_field("story", "story is empty"));
        }
        if self.timeline.is_empty() {
            return Err(WhatIfError::invalid_field("timeline", "timeline is empty"));
        }
        if let Some(index) = self
            .timeline
            .iter()
            .position(|e| e.year.trim().is_empty() || e.event.trim().is_empty())
        {
            return Err(WhatIfError::invalid_field(
                "timeline",
                format!("timeline[{}] is incomplete", index),
            ));
        }
        if self.key_events.is_empty() {
            return Err(WhatIfError::invalid_field("key_events", "key_events is empty"));
        }
        if !self.probability_score.is_finite() || !(0.0..=1.0).contains(&self.probability_score) {
            return Err(WhatIfError::invalid_field(
                "probability_score",
                format!("probability_score {} outside [0, 1]", self.probability_score),
            ));
        }
        Ok(())
    }

    /// Parse and validate a raw provider response
    pub fn from_response(provider: &str, raw: &str) -> WhatIfResult<Self> {
        let value = extract_json(raw)
            .ok_or_else(|| WhatIfError::malformed(provider, "no JSON object in response"))?;
        let payload: Self = serde_json::from_value(value)
            .map_err(|e| WhatIfError::malformed(provider, e.to_string()))?;
        payload
            .validate()
            .map_err(|e| match e {
                WhatIfError::InvalidInput { message, .. } => WhatIfError::malformed(provider, message),
                other => other,
            })?;
        Ok(payload)
    }
}

/// Find the JSON object in a model response
///
/// Tries, in order: the body of the first code fence, the whole text, and the
/// span from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    [strip_fence(trimmed), Some(trimmed), brace_span(trimmed)]
        .into_iter()
        .flatten()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
}

fn strip_fence(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_marker = &text[start + 3..];
    // skip the language tag line
    let body_start = after_marker.find('\n')? + 1;
    let body = &after_marker[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Where a payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSource {
    Llm,
    Procedural,
    Cache,
}

impl fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Llm => write!(f, "llm"),
            Self::Procedural => write!(f, "procedural"),
            Self::Cache => write!(f, "cache"),
        }
    }
}

/// Gateway result: a valid payload plus provenance
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedNarrative {
    pub payload: NarrativePayload,
    pub source: PayloadSource,
    /// Chain link that produced the payload, if any
    pub provider: Option<String>,
    /// Provider attempts made for this request
    pub attempts: usize,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
