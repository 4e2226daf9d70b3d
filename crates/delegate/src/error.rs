//! Delegate error types.

use domain::{ErrorKind, ServiceError};
use thiserror::Error;

/// The call never produced a business answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Nothing is bound under the service's name.
    #[error("No service bound under '{0}'")]
    NotBound(String),

    /// The request could not be delivered or its response not read.
    #[error("Dispatch to '{service}' failed: {reason}")]
    Dispatch { service: String, reason: String },

    /// The service answered with something that is neither a result nor an
    /// error body.
    #[error("Malformed response from '{service}': {reason}")]
    Protocol { service: String, reason: String },
}

/// Errors returned by every delegate operation.
///
/// Business failures and transport failures are kept apart so callers can
/// tell "the data was invalid" from "the service was unreachable".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegateError {
    /// The service ran and rejected the call.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The service could not be reached.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl DelegateError {
    pub fn is_transport(&self) -> bool {
        matches!(self, DelegateError::Transport(_))
    }

    /// Kind of the business error, `None` for transport failures.
    pub fn service_kind(&self) -> Option<ErrorKind> {
        match self {
            DelegateError::Service(err) => Some(err.kind()),
            DelegateError::Transport(_) => None,
        }
    }
}

/// Failures of the naming registry itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("'{0}' is already bound")]
    AlreadyBound(String),

    #[error("'{0}' is not bound")]
    NotBound(String),
}

/// Convenience type alias for delegate results.
pub type Result<T> = std::result::Result<T, DelegateError>;
