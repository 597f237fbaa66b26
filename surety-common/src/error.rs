use thiserror::Error;

use crate::env::value::Amount;
use crate::utils::Principal;

pub type Result<T> = std::result::Result<T, SuretyError>;

/// Coarse classification handed back to callers that only need to decide
/// whether to retry, fix their request, or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Gate closed; retry once reopened.
    NotOperational,
    /// Caller lacks the role, funding or index the operation needs.
    Unauthorized,
    /// Referenced entity is absent.
    NotFound,
    /// Idempotent duplicate; safe to ignore.
    AlreadyRegistered,
    /// Malformed or out-of-range input.
    Invalid,
    Internal,
}

#[derive(Debug, Error)]
pub enum SuretyError {
    #[error("Contract is currently not operational")]
    NotOperational,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requester must have deposited its stake before registering or voting.
    #[error("Requester {0} is not a funded airline")]
    RequesterNotFunded(Principal),

    #[error("Not registered: {0}")]
    NotRegistered(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Insufficient value: required {required}, provided {provided}")]
    InsufficientValue { required: Amount, provided: Amount },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SuretyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SuretyError::NotOperational => ErrorKind::NotOperational,
            SuretyError::Unauthorized(_) | SuretyError::RequesterNotFunded(_) => ErrorKind::Unauthorized,
            SuretyError::NotRegistered(_) | SuretyError::NotFound(_) => ErrorKind::NotFound,
            SuretyError::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            SuretyError::InsufficientValue { .. }
            | SuretyError::InvalidInput(_)
            | SuretyError::Config(_)
            | SuretyError::Serialization(_) => ErrorKind::Invalid,
            SuretyError::LockPoisoned(_) | SuretyError::Io(_) => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::NotOperational
    }
}

impl<T> From<std::sync::PoisonError<T>> for SuretyError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        SuretyError::LockPoisoned("shared state")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(SuretyError::NotOperational.kind(), ErrorKind::NotOperational);
        assert_eq!(
            SuretyError::RequesterNotFunded(Principal::from("a")).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(SuretyError::NotRegistered("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(SuretyError::AlreadyRegistered("x".into()).kind(), ErrorKind::AlreadyRegistered);
    }

    #[test]
    fn test_only_gate_errors_are_retryable() {
        assert!(SuretyError::NotOperational.is_retryable());
        assert!(!SuretyError::Unauthorized("nope".into()).is_retryable());
        assert!(!SuretyError::InsufficientValue { required: 10, provided: 1 }.is_retryable());
    }
}
