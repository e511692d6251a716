use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Externally visible message for every rejected completion callback.
/// Invalid signature, unknown order and already-paid all render the same.
pub const VERIFICATION_FAILED: &str = "Payment verification failed";

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed or incomplete request payloads
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing secret or credential; the affected operation refuses to serve
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment gateway unreachable or rejected the request
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Ledger store unreachable or the write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Signature mismatch or ledger guard mismatch
    #[error("{}", VERIFICATION_FAILED)]
    Verification,

    /// Notification delivery failed. Logged by the dispatcher, never returned to clients
    #[error("Notification error: {0}")]
    Notification(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.public_message(),
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Verification => StatusCode::BAD_REQUEST,
            AppError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        AppError::Gateway(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        AppError::Persistence(msg.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        AppError::Notification(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Whether the caller may safely retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Gateway(_) | AppError::Persistence(_) | AppError::RateLimitExceeded(_)
        )
    }

    /// Message rendered to HTTP clients. Store and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Persistence(_) => {
                "Order store temporarily unavailable, please retry".to_string()
            }
            AppError::Configuration(_) | AppError::Internal(_) | AppError::Notification(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}
