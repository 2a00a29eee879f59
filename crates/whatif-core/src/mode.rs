//! Simulation modes

use crate::error::WhatIfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How outcomes should be weighted when generating a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Likely outcomes based on real-world odds
    #[default]
    #[serde(rename = "realistic")]
    Realistic,
    /// Equal weight to good and bad outcomes
    #[serde(rename = "50/50")]
    Balanced,
    /// Surprising and improbable events
    #[serde(rename = "random")]
    Random,
}

impl SimulationMode {
    pub const ALL: [SimulationMode; 3] = [Self::Realistic, Self::Balanced, Self::Random];

    /// Canonical wire name, also used in cache fingerprints
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Balanced => "50/50",
            Self::Random => "random",
        }
    }

    /// Parse user input, falling back to `Realistic` for anything unknown
    pub fn parse_lenient(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }

    /// Instruction appended to prompts for this mode
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Realistic => {
                "Use realistic probabilities and likely outcomes based on real-world data."
            }
            Self::Balanced => "Give equal weight to positive and negative outcomes.",
            Self::Random => "Include surprising, unlikely, or wildly improbable events.",
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationMode {
    type Err = WhatIfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realistic" => Ok(Self::Realistic),
            "50/50" | "balanced" => Ok(Self::Balanced),
            "random" => Ok(Self::Random),
            other => Err(WhatIfError::invalid_field(
                "mode",
                format!("Unknown simulation mode: {}", other),
            )),
        }
    }
}
