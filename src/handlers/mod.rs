pub mod audit;
pub mod auth;
pub mod games;
pub mod health;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids arrive as raw strings; a malformed id is a client error, not a
/// routing miss or a server fault.
pub fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id format", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_client_errors() {
        assert!(parse_uuid("550e8400-e29b-41d4-a716-446655440000", "game").is_ok());
        let err = parse_uuid("not-a-uuid", "game").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
