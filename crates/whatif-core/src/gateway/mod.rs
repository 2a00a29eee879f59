//! Provider gateway
//!
//! Orchestrates cache lookup, rate-limit admission, the provider fallback
//! chain, usage recording and procedural fallback for each request.

mod builder;
mod orchestrator;
mod request;
mod state;


pub use builder::GatewayBuilder;
pub use orchestrator::ProviderGateway;
pub use request::{GenerationRequest, ModelPreferences, PromptContext};
pub use state::GatewayState;
