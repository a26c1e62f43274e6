//! Role allow-list gate. Policy is declared per route group in the router,
//! evaluated by one function so it stays centrally auditable.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::models::user::UserRole;

pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
pub const CATALOG_EDITORS: &[UserRole] = &[UserRole::Admin, UserRole::Moderator];

/// No identity → 401. Role outside the allow-list → 403 carrying both the
/// required roles and the caller's actual role.
pub async fn authorize(
    allowed: &'static [UserRole],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !allowed.contains(&user.role) {
        return Err(ApiError::forbidden(
            "Insufficient permissions",
            allowed.iter().map(|role| role.to_string()).collect(),
            user.role.as_str(),
        ));
    }

    Ok(next.run(request).await)
}
