//! Router assembly: route groups, role policy per group, rate limiting and
//! the global layers.

use axum::http::{Method, Uri};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{audit, auth, games, health};
use crate::middleware::rate_limit::{
    auth_rate_limit, create_rate_limit, general_rate_limit, search_rate_limit,
};
use crate::middleware::{authorize, optional_auth, require_auth, ADMIN_ONLY, CATALOG_EDITORS};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health::health))
        .route("/games", get(games::list))
        .route("/games/stats/count", get(games::count))
        .route("/games/stats/genres", get(games::genres))
        .route("/games/stats/platforms", get(games::platforms))
        .route("/games/:id", get(games::get_by_id));

    // Search personalizes for authenticated callers but never requires them
    let search = Router::new()
        .route("/games/search", get(games::search))
        .route_layer(from_fn(optional_auth))
        .route_layer(from_fn_with_state(state.clone(), search_rate_limit));

    // Only failed attempts count against the auth limiter
    let credentials = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route_layer(from_fn_with_state(state.clone(), auth_rate_limit));

    let profile = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route_layer(from_fn(require_auth));

    let catalog_create = Router::new()
        .route("/games", post(games::create))
        .route_layer(from_fn_with_state(state.clone(), create_rate_limit))
        .route_layer(from_fn(|req, next| authorize(CATALOG_EDITORS, req, next)))
        .route_layer(from_fn(require_auth));

    let catalog_update = Router::new()
        .route("/games/:id", put(games::update))
        .route_layer(from_fn(|req, next| authorize(CATALOG_EDITORS, req, next)))
        .route_layer(from_fn(require_auth));

    let catalog_delete = Router::new()
        .route("/games/:id", delete(games::delete))
        .route_layer(from_fn(|req, next| authorize(ADMIN_ONLY, req, next)))
        .route_layer(from_fn(require_auth));

    let user_admin = Router::new()
        .route("/auth/users", get(auth::list_users))
        .route("/auth/users/:id/role", patch(auth::change_role))
        .route("/auth/users/:id/deactivate", patch(auth::deactivate))
        .route_layer(from_fn(|req, next| authorize(ADMIN_ONLY, req, next)))
        .route_layer(from_fn(require_auth));

    let audit_admin = Router::new()
        .route("/audit/logs", get(audit::list).delete(audit::purge))
        .route("/audit/stats", get(audit::action_stats))
        .route("/audit/users/:id/logs", get(audit::user_logs))
        .route_layer(from_fn(|req, next| authorize(ADMIN_ONLY, req, next)))
        .route_layer(from_fn(require_auth));

    Router::new()
        .merge(public)
        .merge(search)
        .merge(credentials)
        .merge(profile)
        .merge(catalog_create)
        .merge(catalog_update)
        .merge(catalog_delete)
        .merge(user_admin)
        .merge(audit_admin)
        .fallback(fallback)
        .layer(from_fn_with_state(state.clone(), general_rate_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::Json<Value> {
    axum::Json(json!({
        "success": true,
        "data": {
            "name": "GameVault API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Video-game catalog REST API with JWT authentication and role-based authorization",
            "endpoints": {
                "auth": "/auth/register, /auth/login (public), /auth/profile (authenticated), /auth/users/* (admin)",
                "games": "/games, /games/:id, /games/search, /games/stats/* (public reads; mutations gated by role)",
                "audit": "/audit/logs, /audit/stats, /audit/users/:id/logs (admin)",
                "health": "/health",
            }
        }
    }))
}

/// Unmatched routes get the standard envelope naming the attempted
/// method and path.
async fn fallback(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route not found: {} {}", method, uri.path()))
}
