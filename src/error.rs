// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// One per-field validation failure, reported back to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden - includes role context for diagnosability
    Forbidden {
        message: String,
        required_roles: Vec<String>,
        user_role: String,
    },

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (uniqueness violations)
    Conflict {
        message: String,
        errors: Vec<FieldError>,
    },

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::Validation { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::Forbidden { message, .. } => message,
        }
    }

    /// Convert to the standard response envelope with `success: false`
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "message": self.client_message(),
        });

        match self {
            ApiError::Validation { errors, .. } | ApiError::Conflict { errors, .. } => {
                if !errors.is_empty() {
                    body["errors"] = json!(errors);
                }
            }
            ApiError::Forbidden {
                required_roles,
                user_role,
                ..
            } => {
                body["requiredRoles"] = json!(required_roles);
                body["userRole"] = json!(user_role);
            }
            _ => {}
        }

        body
    }

    /// Internal error details are only exposed outside production
    fn client_message(&self) -> String {
        match self {
            ApiError::Internal(msg) => {
                if crate::config::config().security.expose_error_details {
                    msg.clone()
                } else {
                    "An internal error occurred while processing your request".to_string()
                }
            }
            other => other.message().to_string(),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(
        message: impl Into<String>,
        required_roles: Vec<String>,
        user_role: impl Into<String>,
    ) -> Self {
        ApiError::Forbidden {
            message: message.into(),
            required_roles,
            user_role: user_role.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        ApiError::Conflict {
            message: message.into(),
            errors,
        }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db_err) => {
                // Unique-index violations become a structured per-field conflict
                if db_err.code().as_deref() == Some("23505") {
                    let field = constraint_field(db_err.constraint().unwrap_or(""));
                    return ApiError::conflict(
                        "Resource already exists",
                        vec![FieldError::new(field, "This value already exists")],
                    );
                }
                tracing::error!("Database error: {}", db_err);
                ApiError::internal("Database error occurred")
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                tracing::error!("Database unavailable: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            _ => {
                tracing::error!("SQLx error: {}", err);
                ApiError::internal("Database error occurred")
            }
        }
    }
}

/// Derive the offending field name from a unique constraint name
/// (e.g. "users_email_key" -> "email").
fn constraint_field(constraint: &str) -> String {
    constraint
        .trim_end_matches("_key")
        .trim_end_matches("_idx")
        .rsplit('_')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::forbidden("x", vec![], "user").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("x", vec![]).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forbidden_includes_role_context() {
        let err = ApiError::forbidden(
            "Insufficient permissions",
            vec!["admin".to_string()],
            "user",
        );
        let body = err.to_json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["requiredRoles"], json!(["admin"]));
        assert_eq!(body["userRole"], json!("user"));
    }

    #[test]
    fn validation_carries_field_errors() {
        let err = ApiError::validation(
            "Validation error",
            vec![FieldError::new("title", "Title must be at least 2 characters")],
        );
        let body = err.to_json();
        assert_eq!(body["errors"][0]["field"], json!("title"));
    }

    #[test]
    fn constraint_names_map_to_fields() {
        assert_eq!(constraint_field("users_email_key"), "email");
        assert_eq!(constraint_field("users_username_key"), "username");
        assert_eq!(constraint_field(""), "unknown");
    }
}
