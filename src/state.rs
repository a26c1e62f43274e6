//! Composition root: everything a handler needs, built once at startup and
//! cloned per request. Services receive the pool explicitly rather than
//! reaching for a global.

use sqlx::PgPool;

use crate::config::config;
use crate::middleware::rate_limit::RateLimiters;
use crate::services::{AuditLogService, AuthService, GameService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub games: GameService,
    pub auth: AuthService,
    pub audit: AuditLogService,
    pub limiters: RateLimiters,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            games: GameService::new(pool.clone()),
            auth: AuthService::new(pool.clone()),
            audit: AuditLogService::new(pool.clone()),
            limiters: RateLimiters::from_config(&config().rate_limit),
            pool,
        }
    }
}
