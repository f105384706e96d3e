/**
 * API Error Types
 *
 * This module defines the error taxonomy for all BFF routes. Every error is
 * translated locally into the response envelope; nothing is retried and
 * nothing escalates beyond the HTTP response.
 *
 * # Error Categories
 *
 * - Client input errors (missing/invalid identifiers) -> 400
 * - Authentication/authorization errors -> 401/403
 * - Configuration errors (missing upstream URL) -> 500/503
 * - Upstream errors -> status mirrored from the upstream, else 502
 * - Removed endpoints -> 410 with an explanatory reason
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::envelope::Envelope;

/// Error type returned by every route handler
///
/// Each variant maps to a fixed HTTP status and a machine-readable code that
/// lands in `error.code` of the response envelope. Upstream variants carry the
/// raw upstream body in `error.details` for operator diagnosis.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session, or the session token failed verification
    #[error("missing or invalid session")]
    Unauthorized,

    /// The authenticated user has no company number, so no upstream data is
    /// reachable for them
    #[error("caller has no company scope")]
    ForbiddenCompanyNumber,

    /// A required upstream base URL is absent from the environment
    #[error("missing configuration: {code}")]
    NotConfigured {
        /// Machine-readable code, e.g. `FLOW_SERVICE_URL_NOT_CONFIGURED`
        code: &'static str,
    },

    /// `DATABASE_URL` is not set; auth-dependent routes cannot be served
    #[error("database is not configured")]
    DatabaseNotConfigured,

    /// Client supplied a malformed or incomplete request
    #[error("invalid request: {code}")]
    BadRequest { code: String },

    /// The referenced resource does not exist within the caller's scope
    #[error("not found: {code}")]
    NotFound { code: String },

    /// The endpoint has been decommissioned
    #[error("endpoint removed: {reason}")]
    Gone { reason: String },

    /// The upstream answered with a non-2xx status; mirrored to the caller
    #[error("upstream returned {status} ({code})")]
    Upstream {
        code: String,
        status: StatusCode,
        /// Raw upstream body, JSON or text
        details: Option<Value>,
    },

    /// The upstream could not be reached at all
    #[error("upstream unreachable ({code}): {message}")]
    UpstreamUnreachable { code: String, message: String },

    /// The upstream 2xx body matched neither a bare array nor an
    /// `{items: [...]}` wrapper
    #[error("upstream response shape not recognized")]
    UnexpectedUpstreamShape,

    /// Database error during a user lookup
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failure
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Session token could not be created
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// Create a client input error with a field-specific code
    pub fn bad_request(code: impl Into<String>) -> Self {
        Self::BadRequest { code: code.into() }
    }

    /// Create a not-found error with a resource-specific code
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// Create an upstream error mirroring the upstream status
    pub fn upstream(code: impl Into<String>, status: StatusCode, details: Value) -> Self {
        Self::Upstream {
            code: code.into(),
            status,
            details: Some(details),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::ForbiddenCompanyNumber => StatusCode::FORBIDDEN,
            Self::NotConfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::DatabaseNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Gone { .. } => StatusCode::GONE,
            Self::Upstream { status, .. } => *status,
            Self::UpstreamUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::UnexpectedUpstreamShape => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Hash(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the machine-readable code for the envelope
    pub fn code(&self) -> String {
        match self {
            Self::Unauthorized => "UNAUTHORIZED".to_string(),
            Self::ForbiddenCompanyNumber => "FORBIDDEN_COMPANY_NUMBER".to_string(),
            Self::NotConfigured { code } => (*code).to_string(),
            Self::DatabaseNotConfigured => "DATABASE_NOT_CONFIGURED".to_string(),
            Self::BadRequest { code } => code.clone(),
            Self::NotFound { code } => code.clone(),
            Self::Gone { .. } => "ENDPOINT_REMOVED".to_string(),
            Self::Upstream { code, .. } => code.clone(),
            Self::UpstreamUnreachable { code, .. } => code.clone(),
            Self::UnexpectedUpstreamShape => "UNEXPECTED_UPSTREAM_SHAPE".to_string(),
            Self::Database(_) => "DATABASE_ERROR".to_string(),
            Self::Hash(_) => "PASSWORD_HASH_FAILED".to_string(),
            Self::Token(_) => "TOKEN_ERROR".to_string(),
        }
    }

    /// Get the diagnostic details for the envelope, if any
    ///
    /// Upstream variants preserve the raw upstream body; removed endpoints
    /// carry a `reason` pointing callers at the replacement API. Internal
    /// errors carry nothing beyond the code (the cause is logged instead).
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::Upstream { details, .. } => details.clone(),
            Self::UpstreamUnreachable { message, .. } => Some(json!({ "message": message })),
            Self::Gone { reason } => Some(json!({ "reason": reason })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = %self.code(), "request failed: {}", self);
        } else {
            tracing::warn!(code = %self.code(), "request rejected: {}", self);
        }
        let envelope = Envelope::<Value>::error(self.code(), self.details());
        (status, Json(envelope)).into_response()
    }
}
