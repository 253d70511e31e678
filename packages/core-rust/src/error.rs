//! Failure types returned by node collaborators.
//!
//! Collaborators report typed failures through [`ServiceError`]. Every variant
//! except [`ServiceError::Internal`] carries a stable machine-readable code so
//! the RPC layer can pass it through to callers unchanged.

use thiserror::Error;

/// Typed failure returned by collaborator operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced resource does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The caller supplied an argument the collaborator rejects.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A resource with the same identity already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The caller is not allowed to perform the operation (e.g. wrong key password).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The collaborator cannot serve the request right now (syncing, not mining, timed out).
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Anything the collaborator could not classify.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::NotFound`].
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Stable code for typed failures; `None` for unclassified ones.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("RESOURCE_NOT_FOUND"),
            Self::InvalidArgument(_) => Some("INVALID_ARGUMENT"),
            Self::AlreadyExists(_) => Some("ALREADY_EXISTS"),
            Self::PermissionDenied(_) => Some("PERMISSION_DENIED"),
            Self::Unavailable(_) => Some("UNAVAILABLE"),
            Self::Internal(_) => None,
        }
    }
}

/// Reasons a credential store refuses a credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unknown access token: {0}")]
    UnknownToken(String),
    #[error("secret mismatch for access token: {0}")]
    SecretMismatch(String),
    #[error("credential store failure")]
    Store(#[source] anyhow::Error),
}
