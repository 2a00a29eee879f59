//! Life-path simulation on top of the provider gateway
//!
//! A simulation sanitizes the user's decision, issues one gateway request
//! per branch concurrently and scores the resulting narratives.

mod category;
mod engine;
mod prompt;
mod sanitize;
mod scoring;


pub use category::DecisionCategory;
pub use engine::{LifeBranch, Simulation, SimulationEngine, DEFAULT_BRANCHES, MAX_BRANCHES};
pub use prompt::{build_prompt, UserContext};
pub use sanitize::{check_content_safety, sanitize_decision, sanitize_output, MAX_DECISION_CHARS};
pub use scoring::fate_score;
