use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for API responses that adds the `{success: true, message, data?}`
/// envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: Option<T>,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            status_code: None,
        }
    }
}

impl ApiResponse<()> {
    /// 200 OK with a message and no payload
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            status_code: None,
        }
    }

    /// 201 Created with a message and no payload
    pub fn created(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            status_code: Some(StatusCode::CREATED),
        }
    }

    /// 204 No Content (empty body)
    pub fn no_content() -> Self {
        Self {
            message: String::new(),
            data: None,
            status_code: Some(StatusCode::NO_CONTENT),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        let mut envelope = json!({
            "success": true,
            "message": self.message,
        });

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    envelope["data"] = value;
                }
                Err(e) => {
                    tracing::error!("failed to serialize response data: {}", e);
                    return crate::error::ApiError::internal("Failed to format response")
                        .into_response();
                }
            }
        }

        (status, Json(envelope)).into_response()
    }
}

/// Convenience result alias for handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
