//! Resilient API client.
//!
//! # Responsibilities
//! - Compose cache, rate limiter, retry handler and classifier per request
//! - Track the latest upstream rate limit snapshot
//! - Tag every request with a request ID span
//!
//! # Design Decisions
//! - The client owns one limiter, one cache and one retry handler, built from
//!   its config; nothing is shared through globals
//! - One permit is acquired per logical request, before the retry loop
//! - Only failures classified as transient are retried
//! - Only successful, parsed responses are cached

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::config::ResilienceConfig;
use crate::http::request::ApiRequest;
use crate::http::response::{is_quota_exhausted, parse_rate_limit};
use crate::http::transport::{HttpTransport, ReqwestTransport};
use crate::http::types::{ClientError, ClientResult};
use crate::observability::metrics;
use crate::rate_limit::{RateLimitInfo, RateLimiter};
use crate::resilience::timeouts::with_timeout;
use crate::resilience::{RetryHandler, RetryPolicy};

/// API client with caching, rate limiting and retries.
pub struct ResilientClient<T> {
    transport: T,
    limiter: RateLimiter,
    cache: Option<TtlCache<Value>>,
    retry: RetryHandler,
    max_wait: Option<Duration>,
    upstream_limit: Mutex<Option<RateLimitInfo>>,
}

impl ResilientClient<ReqwestTransport> {
    /// Build a client that talks HTTP through `reqwest`.
    pub fn from_config(config: &ResilienceConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(&config.client)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> ResilientClient<T> {
    /// Build a client around any transport.
    pub fn new(transport: T, config: &ResilienceConfig) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| TtlCache::new(config.cache.default_ttl(), config.cache.max_size));

        tracing::info!(
            rate_limit = config.rate_limit.limit,
            window_secs = config.rate_limit.window_secs,
            cache_enabled = config.cache.enabled,
            max_retries = config.retries.max_retries,
            "Resilient client initialized"
        );

        Self {
            transport,
            limiter: RateLimiter::new(config.rate_limit.limit, config.rate_limit.window()),
            cache,
            retry: RetryHandler::new(RetryPolicy::from(&config.retries)),
            max_wait: config.rate_limit.max_wait(),
            upstream_limit: Mutex::new(None),
        }
    }

    /// Fetch `request`, from cache when possible.
    pub async fn get(&self, request: &ApiRequest) -> ClientResult<Value> {
        let span = tracing::info_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            endpoint = %request.endpoint
        );
        self.fetch(request).instrument(span).await
    }

    async fn fetch(&self, request: &ApiRequest) -> ClientResult<Value> {
        let key = request.cache_key();

        if let Some(cache) = &self.cache {
            if let Some(value) = cache.get(&key) {
                tracing::debug!("Cache hit");
                return Ok(value);
            }
            tracing::debug!("Cache miss");
        }

        self.acquire_permit().await?;

        let value = self
            .retry
            .retry_if(move || self.execute_once(request), ClientError::is_retryable)
            .await?;

        if let Some(cache) = &self.cache {
            cache.set(key, value.clone());
        }
        Ok(value)
    }

    async fn acquire_permit(&self) -> ClientResult<()> {
        match self.max_wait {
            Some(limit) => with_timeout(limit, self.limiter.acquire(1)).await??,
            None => self.limiter.acquire(1).await?,
        }
        Ok(())
    }

    async fn execute_once(&self, request: &ApiRequest) -> ClientResult<Value> {
        let response = self.transport.execute(request).await?;
        metrics::record_response(response.status);

        if let Some(info) = parse_rate_limit(&response.headers) {
            tracing::debug!(
                used = info.used,
                limit = info.limit,
                remaining = info.remaining,
                reset = info.reset,
                "Upstream rate limit"
            );
            *self.lock_upstream_limit() = Some(info);

            if is_quota_exhausted(&info) {
                tracing::warn!(reset = info.reset, "Upstream rate limit exhausted");
                return Err(ClientError::QuotaExhausted(info));
            }
        }

        if !response.is_success() {
            let err = ClientError::from_status(response.status, &response.body);
            tracing::warn!(status = response.status, error = %err, "Upstream request failed");
            return Err(err);
        }

        serde_json::from_str(&response.body).map_err(|e| ClientError::InvalidJson(e.to_string()))
    }

    /// Latest rate limit reported by the upstream, if any response carried one.
    pub fn rate_limit_info(&self) -> Option<RateLimitInfo> {
        *self.lock_upstream_limit()
    }

    /// Snapshot of the local rate limiter.
    pub fn limiter_info(&self) -> RateLimitInfo {
        self.limiter.info()
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
            tracing::info!("Cache cleared");
        }
    }

    /// Number of cached responses (zero when caching is disabled).
    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, TtlCache::size)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn lock_upstream_limit(&self) -> MutexGuard<'_, Option<RateLimitInfo>> {
        self.upstream_limit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for ResilientClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientClient")
            .field("limit", &self.limiter.limit())
            .field("window", &self.limiter.window())
            .field("cache_enabled", &self.cache.is_some())
            .field("retry", self.retry.policy())
            .finish()
    }
}
