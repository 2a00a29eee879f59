//! Per-request gateway states, used for tracing

use std::fmt;

/// Steps a request moves through
///
/// `CacheCheck → RateLimitCheck → Calling(i) → {Success | NextProvider |
/// Exhausted} → ProceduralFallback → Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    CacheCheck,
    RateLimitCheck,
    Calling(usize),
    Success,
    NextProvider,
    Exhausted,
    ProceduralFallback,
    Done,
}

impl fmt::Display for GatewayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheCheck => write!(f, "CACHE_CHECK"),
            Self::RateLimitCheck => write!(f, "RATE_LIMIT_CHECK"),
            Self::Calling(index) => write!(f, "CALLING({})", index),
            Self::Success => write!(f, "SUCCESS"),
            Self::NextProvider => write!(f, "NEXT_PROVIDER"),
            Self::Exhausted => write!(f, "EXHAUSTED"),
            Self::ProceduralFallback => write!(f, "PROCEDURAL_FALLBACK"),
            Self::Done => write!(f, "DONE"),
        }
    }
}
