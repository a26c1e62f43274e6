//! Account endpoints. Register and login feed the audit trail; the admin
//! operations are gated by the authorize layer in the router.

use axum::extract::{Extension, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::parse_uuid;
use crate::middleware::auth::AuthUser;
use crate::middleware::client_ip_from_headers;
use crate::models::audit::NewAuditLog;
use crate::models::user::{ChangeRoleRequest, LoginRequest, RegisterRequest, User, UserRole};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Value> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();

    let outcome = state.auth.register(request).await?;

    state
        .audit
        .log(
            NewAuditLog::new("REGISTER", "auth")
                .user(outcome.user.id)
                .details(json!({ "username": username, "email": email }))
                .ip(client_ip_from_headers(&headers)),
        )
        .await;

    Ok(ApiResponse::created(json!({
        "token": outcome.token,
        "user": outcome.user.to_identity(),
    }))
    .with_message("Registration successful"))
}

/// Every attempt is audited, success or not, before the outcome is
/// reported to the caller.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Value> {
    let email = request.email.trim().to_lowercase();
    let ip = client_ip_from_headers(&headers);

    match state.auth.login(request).await {
        Ok(outcome) => {
            state
                .audit
                .log(
                    NewAuditLog::new("LOGIN_SUCCESS", "auth")
                        .user(outcome.user.id)
                        .details(json!({ "email": email }))
                        .ip(ip),
                )
                .await;

            Ok(ApiResponse::success(json!({
                "token": outcome.token,
                "user": outcome.user.to_identity(),
            }))
            .with_message("Login successful"))
        }
        Err(err) => {
            state
                .audit
                .log(
                    NewAuditLog::new("LOGIN_FAILED", "auth")
                        .details(json!({ "email": email }))
                        .ip(ip),
                )
                .await;
            Err(err)
        }
    }
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<User> {
    let user = state.auth.profile(auth_user.id).await?;
    Ok(ApiResponse::success(user))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.auth.list_users().await?;
    Ok(ApiResponse::success(users))
}

pub async fn change_role(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<ChangeRoleRequest>,
) -> ApiResult<User> {
    let id = parse_uuid(&id, "user")?;
    let role: UserRole = request
        .role
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid role: must be user, admin or moderator"))?;

    let user = state.auth.change_role(id, role).await?;

    state
        .audit
        .log(
            NewAuditLog::new("ROLE_CHANGE", "users")
                .user(auth_user.id)
                .resource_id(id.to_string())
                .details(json!({ "newRole": role }))
                .ip(client_ip_from_headers(&headers)),
        )
        .await;

    Ok(ApiResponse::success(user).with_message("Role updated successfully"))
}

pub async fn deactivate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id = parse_uuid(&id, "user")?;
    let user = state.auth.deactivate(id).await?;

    state
        .audit
        .log(
            NewAuditLog::new("USER_DEACTIVATED", "users")
                .user(auth_user.id)
                .resource_id(id.to_string())
                .ip(client_ip_from_headers(&headers)),
        )
        .await;

    Ok(ApiResponse::success(user).with_message("User deactivated successfully"))
}
