/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `ApiResult<T>`, so library errors convert with `?`.
///
/// Every error renders as
///
/// ```json
/// { "error": "<message>", "details": "<string or object, optional>" }
/// ```
///
/// # Status codes
///
/// | Variant | Status |
/// |---|---|
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 401 |
/// | `Forbidden` | 403 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `Validation`, `ReferenceNotFound`, `Encoding`, `NoRowsAffected` | 422 |
/// | `CorruptRecord`, `Internal` | 500 |

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orderly_shared::auth::{jwt::JwtError, middleware::AuthError, password::PasswordError};
use orderly_shared::codec::EncodingError;
use orderly_shared::error::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Field name → violated rule
pub type FieldErrors = BTreeMap<String, String>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed id or body (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Auth gate rejection (401)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        details: Option<String>,
    },

    /// Login failure (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing entity (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate email (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Field constraint violations (422)
    #[error("Validation failed: {} errors", .0.len())]
    Validation(FieldErrors),

    /// A referenced entity does not exist (422)
    #[error("Referenced {entity} {id} not found")]
    ReferenceNotFound { entity: &'static str, id: Uuid },

    /// A list field in the request could not be encoded (422)
    #[error("Encoding error: {0}")]
    Encoding(EncodingError),

    /// Update changed nothing (422)
    #[error("No rows affected: {0}")]
    NoRowsAffected(String),

    /// Stored data could not be decoded (500)
    #[error("Corrupt record: {0}")]
    CorruptRecord(EncodingError),

    /// Anything else (500); the message is logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Optional detail: a string, or a field → rule map for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    /// Single-field validation error
    pub fn invalid_field(field: impl Into<String>, rule: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), rule.into());
        ApiError::Validation(errors)
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_)
            | ApiError::ReferenceNotFound { .. }
            | ApiError::Encoding(_)
            | ApiError::NoRowsAffected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::CorruptRecord(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error, details) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::NoRowsAffected(msg) => (msg, None),
            ApiError::Unauthorized { message, details } => (message, details.map(Value::String)),
            ApiError::Validation(errors) => (
                "Validation failed".to_string(),
                Some(Value::Object(
                    errors
                        .into_iter()
                        .map(|(field, rule)| (field, Value::String(rule)))
                        .collect(),
                )),
            ),
            ApiError::ReferenceNotFound { entity, id } => (
                format!("Referenced {} not found", entity),
                Some(Value::String(format!("no {} with id {}", entity, id))),
            ),
            ApiError::Encoding(err) => (
                format!("Invalid value for {}", err.field),
                Some(Value::String(err.to_string())),
            ),
            ApiError::CorruptRecord(err) => {
                tracing::error!(field = err.field, reason = %err.reason, "Stored record failed to decode");
                (
                    "Stored record could not be decoded".to_string(),
                    Some(Value::String(err.to_string())),
                )
            }
            ApiError::Internal(msg) => {
                // Logged, never returned to the client
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Convert persistence errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::ReferenceNotFound { entity, id } => {
                ApiError::ReferenceNotFound { entity, id }
            }
            StoreError::NoRowsAffected { .. } => ApiError::NoRowsAffected(err.to_string()),
            StoreError::Database(db_err) => ApiError::from(db_err),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation()
                    && db_err.constraint().is_some_and(|c| c.contains("email"))
                {
                    return ApiError::Conflict("Email already exists".to_string());
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert derive-validation errors to a field → rule map
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(collect_field_errors(&errors))
    }
}

/// Flattens derive-validation errors to the first violated rule per field
pub fn collect_field_errors(errors: &validator::ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors
                .first()
                .map(|first| (field.to_string(), describe_rule(first)))
        })
        .collect()
}

fn describe_rule(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {} characters", min, max),
            (Some(min), None) if min == "1" => "is required".to_string(),
            (Some(min), None) => format!("must be at least {} characters", min),
            (None, Some(max)) => format!("must be at most {} characters", max),
            (None, None) => "has an invalid length".to_string(),
        },
        "email" => "must be a valid email address".to_string(),
        "range" => match (param("min"), param("max")) {
            (Some(min), _) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            (None, None) => "is out of range".to_string(),
        },
        "required" => "is required".to_string(),
        other => other.to_string(),
    }
}

/// Convert list encoding errors raised while binding a request
impl From<EncodingError> for ApiError {
    fn from(err: EncodingError) -> Self {
        ApiError::Encoding(err)
    }
}

/// Convert auth gate errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized {
            message: err.to_string(),
            details: err.details().map(str::to_string),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Token issuance failures are server-side problems
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::Internal(format!("Token operation failed: {}", err))
    }
}
