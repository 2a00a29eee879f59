//! LLM providers and the fallback chain
//!
//! [`ProviderKind`] is the closed set of supported providers. Each chain link
//! pairs a kind and model with an [`LlmProvider`] implementation; in
//! production that is [`HttpProvider`], in tests a mock.

mod chain;
mod error_text;
mod http;
mod kind;
mod traits;

pub use chain::{ChainLink, FallbackChain};
pub use error_text::sanitize_error_text;
pub use http::HttpProvider;
pub use kind::{Dialect, ProviderKind};
pub use traits::{LlmProvider, ProviderRequest, RawCompletion};

#[cfg(test)]
pub use traits::MockLlmProvider;
