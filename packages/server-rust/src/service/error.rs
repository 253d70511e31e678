//! Normalized wire errors.
//!
//! Every failure that reaches a caller is an [`ApiError`] before it is
//! serialized. Collaborator failures are mapped here and nowhere else.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use noderpc_core::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Stable error taxonomy exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input.
    BadRequest,
    /// Unknown path.
    NotFound,
    /// Credential missing or invalid.
    NotAuthenticated,
    /// Collaborator-specific failure carrying its own code.
    OperationFailure,
    /// Unexpected or unclassified failure.
    Internal,
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// The single wire-level error representation.
///
/// `cause` is kept for operator-facing logs only and is never serialized.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    code: &'static str,
    status: StatusCode,
    message: String,
    detail: Option<String>,
    cause: Option<String>,
}

/// JSON body written for every [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    fn new(kind: ErrorKind, code: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            status,
            message: message.into(),
            detail: None,
            cause: None,
        }
    }

    /// Request body could not be decoded into the operation's input shape.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::BadRequest,
            "BAD_REQUEST",
            StatusCode::BAD_REQUEST,
            "check request parameters for missing and/or incorrect values",
        )
        .with_detail(detail)
    }

    /// No route is registered for the requested path.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound, "NOT_FOUND", StatusCode::NOT_FOUND, "not found")
    }

    /// Authentication failed. The cause is logged, never returned to the caller.
    pub fn not_authenticated(cause: impl fmt::Display) -> Self {
        let mut err = Self::new(
            ErrorKind::NotAuthenticated,
            "NOT_AUTHENTICATED",
            StatusCode::UNAUTHORIZED,
            "not authenticated",
        );
        err.cause = Some(cause.to_string());
        err
    }

    /// Unclassified failure. The cause is logged, never returned to the caller.
    pub fn internal(cause: impl fmt::Display) -> Self {
        let mut err = Self::new(
            ErrorKind::Internal,
            "INTERNAL_ERROR",
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error",
        );
        err.cause = Some(cause.to_string());
        err
    }

    /// Collaborator-specific failure with its own code and status.
    pub fn operation(code: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperationFailure, code, status, message)
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Operator-facing cause, if one was recorded.
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind,
            code: self.code.to_string(),
            message: self.message.clone(),
            detail: self.detail.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let Some(code) = err.code() else {
            return Self::internal(format!("{err:#}"));
        };
        let status = match err {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::AlreadyExists(_) => StatusCode::CONFLICT,
            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Unavailable(_) | ServiceError::Internal(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        Self::operation(code, status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::Internal => {
                tracing::error!(code = self.code, cause = ?self.cause, "internal error");
            }
            ErrorKind::OperationFailure => {
                tracing::debug!(code = self.code, message = %self.message, "operation failed");
            }
            _ => {}
        }
        (self.status, Json(self.body())).into_response()
    }
}

// ---------------------------------------------------------------------------
// BuildError
// ---------------------------------------------------------------------------

/// Fatal route-table or chain construction failure. Prevents startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("route registered twice: {0}")]
    DuplicateRoute(&'static str),
    #[error("malformed route path: {0:?}")]
    InvalidPath(&'static str),
    #[error("malformed static asset prefix: {0:?}")]
    InvalidStaticPrefix(String),
    #[error("authentication is enabled but no credential store was supplied")]
    MissingCredentialStore,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
