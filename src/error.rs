// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Application error codes carried in every error body, matching the
/// numeric families existing clients already handle.
pub mod codes {
    pub const UNAUTHORIZED: u16 = 601;
    pub const AUTHORIZATION_DENIED: u16 = 603;
    pub const VALIDATION: u16 = 610;
    pub const INVALID_QUERY_PARAMETER: u16 = 611;
    pub const INVALID_LIST_CONFIGURATION: u16 = 612;
    pub const RESOURCE_NOT_FOUND: u16 = 620;
    pub const PERSISTENCE: u16 = 500;
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized - missing or invalid bearer token
    Unauthorized(String),

    // 403 Forbidden - caller lacks the required grant level
    AuthorizationDenied(String),

    // 400 Bad Request - malformed or conflicting input, with per-field details
    Validation {
        message: String,
        details: HashMap<String, String>,
    },

    // 400 Bad Request - sort/filter on a field not declared in the list configuration
    InvalidQueryParameter(String),

    // 400 Bad Request - unknown resource/list-configuration combination
    InvalidListConfiguration(String),

    // 404 Not Found - per-resource numeric code family (62x)
    NotFound { code: u16, message: String },

    // 500 Internal Server Error - underlying transaction failed
    Persistence(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::AuthorizationDenied(_) => 403,
            ApiError::Validation { .. } => 400,
            ApiError::InvalidQueryParameter(_) => 400,
            ApiError::InvalidListConfiguration(_) => 400,
            ApiError::NotFound { .. } => 404,
            ApiError::Persistence(_) => 500,
        }
    }

    /// Get application error code for the response body
    pub fn app_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => codes::UNAUTHORIZED,
            ApiError::AuthorizationDenied(_) => codes::AUTHORIZATION_DENIED,
            ApiError::Validation { .. } => codes::VALIDATION,
            ApiError::InvalidQueryParameter(_) => codes::INVALID_QUERY_PARAMETER,
            ApiError::InvalidListConfiguration(_) => codes::INVALID_LIST_CONFIGURATION,
            ApiError::NotFound { code, .. } => *code,
            ApiError::Persistence(_) => codes::PERSISTENCE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::AuthorizationDenied(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::InvalidQueryParameter(msg) => msg,
            ApiError::InvalidListConfiguration(msg) => msg,
            ApiError::NotFound { message, .. } => message,
            ApiError::Persistence(msg) => msg,
        }
    }

    /// Convert to the fixed JSON error body shape
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, details } => json!({
                "code": self.app_code(),
                "message": message,
                "details": details,
            }),
            _ => json!({
                "code": self.app_code(),
                "message": self.message(),
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn authorization_denied(message: impl Into<String>) -> Self {
        ApiError::AuthorizationDenied(message.into())
    }

    pub fn validation(message: impl Into<String>, details: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    /// Single-field validation failure
    pub fn validation_field(
        message: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let mut details = HashMap::new();
        details.insert(field.into(), detail.into());
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_query_parameter(message: impl Into<String>) -> Self {
        ApiError::InvalidQueryParameter(message.into())
    }

    pub fn invalid_list_configuration(message: impl Into<String>) -> Self {
        ApiError::InvalidListConfiguration(message.into())
    }

    pub fn not_found(code: u16, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        ApiError::Persistence(message.into())
    }
}

// Convert persistence-layer errors, never exposing SQL details to clients
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("SQLx error: {}", err);
        ApiError::persistence("An error occurred while processing your request")
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Missing configuration: {}", name);
                ApiError::persistence("Service misconfigured")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Invalid DATABASE_URL");
                ApiError::persistence("Service misconfigured")
            }
            DatabaseError::Sqlx(e) => e.into(),
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
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
