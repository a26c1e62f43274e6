use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::pagination::PageMeta;

/// Wrapper for API responses that automatically adds the success envelope:
/// `{ success, message?, data?, pagination?, filters? }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    pagination: Option<PageMeta>,
    filters: Option<Value>,
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful 200 response carrying data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            pagination: None,
            filters: None,
            status: StatusCode::OK,
        }
    }

    /// 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PageMeta) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Echo the applied search filters back to the client
    pub fn with_filters(mut self, filters: impl Serialize) -> Self {
        self.filters = serde_json::to_value(filters).ok();
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match self.data {
            None => None,
            Some(data) => match serde_json::to_value(&data) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            },
        };

        let mut envelope = json!({ "success": true });
        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }
        if let Some(data) = data_value {
            envelope["data"] = data;
        }
        if let Some(pagination) = self.pagination {
            envelope["pagination"] = json!(pagination);
        }
        if let Some(filters) = self.filters {
            envelope["filters"] = filters;
        }

        (self.status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
