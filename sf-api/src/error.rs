//! API error types
//!
//! Every failure crossing the HTTP boundary carries a stable code the
//! client can branch on. Name collisions (`NAME_TAKEN`) and the
//! template-in-use conflict (`TEMPLATE_IN_USE`) are deliberately
//! distinct from generic failures so forms can show their specific
//! messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sf_core::forms::FieldError;
use sf_db::DbError;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field-level validation failures; submission is blocked
    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    /// Unique-key conflict ("already exists")
    #[error("A {entity} with this {field} already exists")]
    NameTaken {
        entity: &'static str,
        field: &'static str,
    },

    /// Template referenced by at least one session
    #[error("Cannot delete a template that is in use by discovery sessions")]
    TemplateInUse,

    /// Resource not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Missing or invalid credentials
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Anything else
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Stable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Field-level details, present for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where an unauthenticated client should go
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<&'static str>,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NameTaken { .. } => StatusCode::CONFLICT,
            ApiError::TemplateInUse => StatusCode::CONFLICT,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::NameTaken { .. } => "NAME_TAKEN",
            ApiError::TemplateInUse => "TEMPLATE_IN_USE",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Create a validation error from field errors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation { errors }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate { entity, field } => ApiError::NameTaken { entity, field },
            DbError::TemplateInUse { .. } => ApiError::TemplateInUse,
            DbError::NotFound { entity, id } => ApiError::not_found(entity, id),
            DbError::Validation(message) => ApiError::Validation {
                errors: vec![FieldError::new("", message)],
            },
            DbError::ForeignKey(message) => ApiError::Validation {
                errors: vec![FieldError::new("", message)],
            },
            DbError::Connection(message)
            | DbError::Query(message)
            | DbError::Serialization(message) => {
                tracing::error!(error = %message, "database failure");
                ApiError::internal(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            ApiError::Validation { errors } => serde_json::to_value(errors).ok(),
            _ => None,
        };
        let redirect_to = match &self {
            ApiError::Unauthorized { .. } => Some(crate::routes::LOGIN_PATH),
            _ => None,
        };
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details,
            redirect_to,
        };

        (status, Json(body)).into_response()
    }
}
