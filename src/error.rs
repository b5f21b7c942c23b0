// HTTP API error taxonomy and translation.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// One field's failure inside a ValidationFailed report.
#[derive(Debug, Clone, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Domain error kinds, independent of transport status codes.
///
/// This is the single place mapping error kind to status and to the
/// `{success: false, title, message, details?}` envelope; handlers never
/// set error statuses themselves.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    InvalidIdentifier(String),
    InvalidField(String),
    InvalidValue(String),
    ValidationFailed {
        message: String,
        details: Vec<FieldIssue>,
    },

    // 401 Unauthorized (no valid session)
    Unauthenticated(String),

    // 403 Forbidden (known caller, not the owner)
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (duplicate username/email)
    Conflict(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier(_)
            | ApiError::InvalidField(_)
            | ApiError::InvalidValue(_)
            | ApiError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope title: the error kind name
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::InvalidIdentifier(_) => "InvalidIdentifier",
            ApiError::InvalidField(_) => "InvalidField",
            ApiError::InvalidValue(_) => "InvalidValue",
            ApiError::ValidationFailed { .. } => "ValidationFailed",
            ApiError::Unauthenticated(_) => "Unauthenticated",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Conflict(_) => "Conflict",
            ApiError::Internal(_) => "Internal",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidIdentifier(msg) => msg,
            ApiError::InvalidField(msg) => msg,
            ApiError::InvalidValue(msg) => msg,
            ApiError::ValidationFailed { message, .. } => message,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "title": self.title(),
            "message": self.message(),
        });

        if let ApiError::ValidationFailed { details, .. } = self {
            body["details"] = json!(details);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        ApiError::InvalidIdentifier(message.into())
    }

    pub fn invalid_field(message: impl Into<String>) -> Self {
        ApiError::InvalidField(message.into())
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        ApiError::InvalidValue(message.into())
    }

    pub fn validation_failed(details: Vec<FieldIssue>) -> Self {
        ApiError::ValidationFailed {
            message: "Invalid Data".to_string(),
            details,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound { entity, .. } => {
                ApiError::not_found(format!("{} Not Found", entity))
            }
            crate::store::StoreError::AlreadyExists { entity, .. } => {
                ApiError::conflict(format!("{} already exists", entity))
            }
            crate::store::StoreError::Unavailable(msg) => {
                // Don't expose store internals to clients
                tracing::error!("store unavailable: {}", msg);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Verification(_) => {
                ApiError::unauthenticated("Unauthorized request")
            }
            other => {
                tracing::error!("token service failure: {}", other);
                ApiError::internal("Failed to establish session")
            }
        }
    }
}

// Standard error trait implementations
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
