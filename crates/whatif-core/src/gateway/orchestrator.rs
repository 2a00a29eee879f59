//! Request orchestration

use super::request::GenerationRequest;
use super::state::GatewayState;
use crate::cache::{CacheKey, CacheStatistics, ResponseCache};
use crate::error::{WhatIfError, WhatIfResult};
use crate::monitor::{TokenUsage, UsageMonitor, UsageRecord, UsageSummary};
use crate::narrative::{GeneratedNarrative, NarrativePayload, PayloadSource};
use crate::procedural;
use crate::provider::{ChainLink, FallbackChain};
use crate::rate_limiter::{BucketStatus, RateLimitConfig, TokenBucket};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Rate-limited, cached gateway over a provider fallback chain
///
/// Construct with [`GatewayBuilder`](super::GatewayBuilder) and share as
/// `Arc<ProviderGateway>`. Bucket, cache and monitor each have their own lock
/// and none is held across a provider call.
#[derive(Debug)]
pub struct ProviderGateway {
    pub(super) chain: FallbackChain,
    pub(super) bucket: TokenBucket,
    pub(super) rate_limit: RateLimitConfig,
    pub(super) cache: ResponseCache<NarrativePayload>,
    pub(super) monitor: UsageMonitor,
    pub(super) procedural_enabled: bool,
}

impl ProviderGateway {
    /// Generate a narrative for `request`
    ///
    /// With procedural fallback enabled this only fails for requests that are
    /// not well-formed. Otherwise exhaustion and rate limiting surface as
    /// `AllProvidersExhausted` and `RateLimitExceeded`.
    pub async fn generate(&self, request: &GenerationRequest) -> WhatIfResult<GeneratedNarrative> {
        self.generate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`generate`](Self::generate), aborting with `Cancelled` once
    /// `cancel` fires
    ///
    /// Cancellation never writes to the cache and never returns a token that
    /// was already charged.
    #[instrument(
        skip(self, request, cancel),
        fields(branch = request.context.branch_index, mode = %request.mode),
        level = "debug"
    )]
    pub async fn generate_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> WhatIfResult<GeneratedNarrative> {
        request.validate()?;
        let started = Instant::now();
        let links = self.chain.ordered(&request.preferences);
        let prompt = request.context.prompt.as_str();

        // the primary link of the effective chain addresses the cache
        debug!(state = %GatewayState::CacheCheck);
        let key = links
            .first()
            .map(|link| CacheKey::fingerprint(&link.model, request.mode.as_str(), prompt));
        if let Some(payload) = key.as_ref().and_then(|key| self.cache.get(key)) {
            self.monitor.record_cache_hit();
            debug!(state = %GatewayState::Done, "Served from cache");
            return Ok(GeneratedNarrative {
                payload,
                source: PayloadSource::Cache,
                provider: None,
                attempts: 0,
                elapsed: started.elapsed(),
            });
        }

        let Some(key) = key else {
            debug!("No providers in effective chain");
            return self.exhausted(request, 0, started);
        };

        debug!(state = %GatewayState::RateLimitCheck);
        let admitted = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WhatIfError::Cancelled),
            admitted = self.bucket.acquire_within(
                self.rate_limit.cost_per_request,
                self.rate_limit.max_wait(),
            ) => admitted?,
        };
        if !admitted {
            self.monitor.record_rate_limited();
            let retry_after = self
                .bucket
                .time_until_available(self.rate_limit.cost_per_request)?;
            warn!(
                "Rate limit exceeded, retry in {:.1}s",
                retry_after.as_secs_f64()
            );
            if !self.procedural_enabled {
                return Err(WhatIfError::rate_limited(retry_after));
            }
            return Ok(self.procedural(request, 0, started));
        }

        for (index, link) in links.iter().enumerate() {
            debug!(state = %GatewayState::Calling(index), provider = %link.label());
            let attempt_started = Instant::now();
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WhatIfError::Cancelled),
                outcome = self.call_link(link, prompt) => outcome,
            };
            let latency = attempt_started.elapsed();

            match outcome {
                Ok((payload, tokens)) => {
                    let cost = tokens.cost(link.price_per_1k);
                    self.monitor
                        .record(UsageRecord::success(link.label(), latency, tokens, cost));
                    self.cache.insert(key.clone(), payload.clone());
                    debug!(state = %GatewayState::Success, provider = %link.label(), cost);
                    return Ok(GeneratedNarrative {
                        payload,
                        source: PayloadSource::Llm,
                        provider: Some(link.label()),
                        attempts: index + 1,
                        elapsed: started.elapsed(),
                    });
                }
                Err(error) => {
                    warn!(provider = %link.label(), kind = %error.kind(), "Provider attempt failed: {}", error);
                    self.monitor
                        .record(UsageRecord::failure(link.label(), latency, error.kind()));
                    debug!(state = %GatewayState::NextProvider);
                }
            }
        }

        self.exhausted(request, links.len(), started)
    }

    async fn call_link(
        &self,
        link: &ChainLink,
        prompt: &str,
    ) -> WhatIfResult<(NarrativePayload, TokenUsage)> {
        let request = link.request(prompt);
        let completion = match tokio::time::timeout(link.timeout, link.provider().call(&request)).await
        {
            Ok(result) => result?,
            Err(_) => return Err(WhatIfError::timeout(link.label(), link.timeout)),
        };

        let payload = NarrativePayload::from_response(&link.label(), &completion.text)?;
        let tokens = TokenUsage::resolve(
            completion.input_tokens,
            completion.output_tokens,
            prompt,
            &completion.text,
        );
        Ok((payload, tokens))
    }

    fn exhausted(
        &self,
        request: &GenerationRequest,
        attempts: usize,
        started: Instant,
    ) -> WhatIfResult<GeneratedNarrative> {
        debug!(state = %GatewayState::Exhausted, attempts);
        if !self.procedural_enabled {
            return Err(WhatIfError::exhausted(attempts));
        }
        Ok(self.procedural(request, attempts, started))
    }

    fn procedural(
        &self,
        request: &GenerationRequest,
        attempts: usize,
        started: Instant,
    ) -> GeneratedNarrative {
        debug!(state = %GatewayState::ProceduralFallback);
        self.monitor.record_procedural_fallback();
        info!(
            branch = request.context.branch_index,
            "Using procedural generation"
        );
        GeneratedNarrative {
            payload: procedural::generate(&request.context, request.mode),
            source: PayloadSource::Procedural,
            provider: None,
            attempts,
            elapsed: started.elapsed(),
        }
    }

    /// Usage snapshot, optionally limited to the last `window`
    pub fn summary(&self, window: Option<Duration>) -> UsageSummary {
        self.monitor.summary(window)
    }

    pub fn rate_limit_status(&self) -> BucketStatus {
        self.bucket.status()
    }

    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }

    /// Purge all cached payloads
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Response cache cleared");
    }

    /// Sweep expired cache entries
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }

    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    pub fn procedural_enabled(&self) -> bool {
        self.procedural_enabled
    }
}
