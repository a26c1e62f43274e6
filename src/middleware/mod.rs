pub mod auth;
pub mod authorize;
pub mod rate_limit;

pub use auth::{optional_auth, require_auth, AuthUser};
pub use authorize::{authorize, ADMIN_ONLY, CATALOG_EDITORS};
pub use rate_limit::{RateLimiter, RateLimiters};

use axum::extract::{ConnectInfo, Request};
use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Client address from proxy headers, when present.
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

/// Best-effort client address for rate limiting. Proxy headers win over the
/// socket address; absent both, all callers share one bucket.
pub fn client_ip(request: &Request) -> String {
    if let Some(ip) = client_ip_from_headers(request.headers()) {
        return ip;
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
