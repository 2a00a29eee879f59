//! What If Core Library
//!
//! A rate-limited, cached gateway for LLM narrative generation and the
//! life-path simulator built on top of it. Requests flow through a response
//! cache, a token-bucket rate limiter and an ordered provider fallback chain,
//! with local procedural generation as the last resort.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mode;
pub mod monitor;
pub mod narrative;
pub mod procedural;
pub mod provider;
pub mod rate_limiter;
pub mod simulation;

// Re-export commonly used types
pub use cache::{CacheConfig, CacheKey, CacheStatistics, ResponseCache};
pub use config::{ConfigLoader, GatewayConfig, LogFormat, LoggingConfig, ProviderConfig};
pub use error::{ErrorKind, WhatIfError, WhatIfResult};
pub use gateway::{GatewayBuilder, GenerationRequest, ModelPreferences, PromptContext, ProviderGateway};
pub use mode::SimulationMode;
pub use monitor::{UsageMonitor, UsageRecord, UsageSummary};
pub use narrative::{GeneratedNarrative, NarrativePayload, PayloadSource, TimelineEvent};
pub use provider::{ChainLink, LlmProvider, ProviderKind, ProviderRequest, RawCompletion};
pub use rate_limiter::{BucketStatus, RateLimitConfig, TokenBucket};
pub use simulation::{LifeBranch, Simulation, SimulationEngine, UserContext};
