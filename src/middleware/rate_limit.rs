//! In-memory token-bucket rate limiting, keyed by client IP.
//!
//! Each rule allows `max_requests` per `window_secs`; tokens refill
//! continuously at the corresponding rate. The auth limiter refunds its
//! token on success so only failed attempts count against the cap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::Mutex;

use crate::config::{config, RateLimitConfig, RateLimitRule};
use crate::error::ApiError;
use crate::middleware::client_ip;
use crate::state::AppState;

/// Bucket count that triggers eviction of fully-refilled idle entries.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    max_tokens: u32,
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens,
            refill_rate,
        }
    }

    pub fn from_rule(rule: &RateLimitRule) -> Self {
        let refill_rate = rule.max_requests as f64 / rule.window_secs as f64;
        Self::new(rule.max_requests, refill_rate)
    }

    /// Attempts to consume one token for the key.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        // A bucket that has refilled to capacity carries no history; drop
        // those before growing the map with a new key.
        if buckets.len() >= PRUNE_THRESHOLD && !buckets.contains_key(key) {
            let max = self.max_tokens as f64;
            let rate = self.refill_rate;
            buckets.retain(|_, b| {
                b.tokens + now.duration_since(b.last_refill).as_secs_f64() * rate < max
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: self.max_tokens as f64,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.max_tokens as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Returns one token to the key's bucket, capped at the maximum.
    pub async fn refund(&self, key: &str) {
        let mut buckets = self.buckets.lock().await;
        if let Some(bucket) = buckets.get_mut(key) {
            bucket.tokens = (bucket.tokens + 1.0).min(self.max_tokens as f64);
        }
    }

    #[cfg(test)]
    async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

/// One limiter per configured rule, shared through `AppState`.
#[derive(Clone)]
pub struct RateLimiters {
    pub general: RateLimiter,
    pub auth: RateLimiter,
    pub create: RateLimiter,
    pub search: RateLimiter,
}

impl RateLimiters {
    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self {
            general: RateLimiter::from_rule(&cfg.general),
            auth: RateLimiter::from_rule(&cfg.auth),
            create: RateLimiter::from_rule(&cfg.create),
            search: RateLimiter::from_rule(&cfg.search),
        }
    }
}

pub async fn general_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config().rate_limit.enabled {
        return Ok(next.run(request).await);
    }
    let ip = client_ip(&request);
    if !state.limiters.general.check(&ip).await {
        return Err(ApiError::too_many_requests(
            "Too many requests, please try again later",
        ));
    }
    Ok(next.run(request).await)
}

/// Stricter cap on authentication attempts. A successful attempt refunds
/// its token, so only failures accumulate.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config().rate_limit.enabled {
        return Ok(next.run(request).await);
    }
    let ip = client_ip(&request);
    if !state.limiters.auth.check(&ip).await {
        return Err(ApiError::too_many_requests(
            "Too many authentication attempts, please try again later",
        ));
    }

    let response = next.run(request).await;
    if response.status().as_u16() < 400 {
        state.limiters.auth.refund(&ip).await;
    }
    Ok(response)
}

pub async fn create_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config().rate_limit.enabled {
        return Ok(next.run(request).await);
    }
    let ip = client_ip(&request);
    if !state.limiters.create.check(&ip).await {
        return Err(ApiError::too_many_requests(
            "Too many creation requests, please try again later",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn search_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config().rate_limit.enabled {
        return Ok(next.run(request).await);
    }
    let ip = client_ip(&request);
    if !state.limiters.search.check(&ip).await {
        return Err(ApiError::too_many_requests(
            "Too many search requests, please try again later",
        ));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bucket_exhausts_then_refuses() {
        let limiter = RateLimiter::new(3, 0.0);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn buckets_are_per_key() {
        let limiter = RateLimiter::new(1, 0.0);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
        assert!(limiter.check("5.6.7.8").await);
    }

    #[tokio::test]
    async fn refund_restores_capacity() {
        let limiter = RateLimiter::new(1, 0.0);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
        limiter.refund("1.2.3.4").await;
        assert!(limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn idle_full_buckets_are_evicted() {
        let limiter = RateLimiter::new(1, 1000.0);
        for i in 0..PRUNE_THRESHOLD {
            limiter.check(&format!("10.0.{}.{}", i / 256, i % 256)).await;
        }
        assert_eq!(limiter.bucket_count().await, PRUNE_THRESHOLD);

        // At 1000 tokens/sec every bucket is back at capacity well within
        // this sleep, so the next new key sweeps them all out.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(limiter.check("10.0.4.0").await);
        assert!(limiter.bucket_count().await <= 2);
    }

    #[tokio::test]
    async fn active_buckets_survive_eviction() {
        let limiter = RateLimiter::new(5, 0.0);
        for i in 0..PRUNE_THRESHOLD {
            limiter.check(&format!("10.0.{}.{}", i / 256, i % 256)).await;
        }
        // Zero refill means every bucket still has history; nothing is
        // evicted and the new key lands on top.
        assert!(limiter.check("10.0.4.0").await);
        assert_eq!(limiter.bucket_count().await, PRUNE_THRESHOLD + 1);
    }

    #[tokio::test]
    async fn refund_never_exceeds_max() {
        let limiter = RateLimiter::new(2, 0.0);
        limiter.check("1.2.3.4").await;
        limiter.refund("1.2.3.4").await;
        limiter.refund("1.2.3.4").await;
        assert!(limiter.check("1.2.3.4").await);
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
    }
}
