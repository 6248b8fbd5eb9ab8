//! Error types for kvlock.
//!
//! Uses thiserror for derive macros. Every variant is an ordinary coordination
//! outcome that callers are expected to branch on, never a reason to abort.

use thiserror::Error;

/// Failure reported by the backing key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request did not complete before its deadline.
    #[error("store request timed out: {0}")]
    Timeout(String),

    /// The connection to the store could not be used (refused, dropped, I/O).
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The store answered with something the client could not interpret.
    #[error("store protocol error: {0}")]
    Protocol(String),

    /// The store signalled that the key does not exist (e.g. a nil script reply).
    #[error("key '{0}' does not exist in the store")]
    KeyAbsent(String),
}

/// Main error type for lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Acquisition lost the race: the key is held by someone else
    /// (or a stale record has not expired yet).
    #[error("lock '{0}' is held by another owner")]
    Contended(String),

    /// Release found no record carrying this handle's token: it expired,
    /// was already released, or was taken over by another owner.
    #[error("lock '{0}' is not held by this handle")]
    NotHeld(String),

    /// The store could not be reached or failed to answer.
    #[error("lock store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The caller passed an unusable key or TTL.
    #[error("{0}")]
    InvalidArgument(String),

    /// Configuration could not be read, parsed or validated.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LockError {
    /// Whether retrying the same request (possibly against another endpoint)
    /// can change the outcome.
    ///
    /// Contention and lost ownership are answers from a healthy store, so
    /// only `StoreUnavailable` qualifies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LockError::StoreUnavailable(_))
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_unavailable_is_retryable() {
        assert!(!LockError::Contended("job".to_string()).is_retryable());
        assert!(!LockError::NotHeld("job".to_string()).is_retryable());
        assert!(!LockError::InvalidArgument("bad".to_string()).is_retryable());
        assert!(!LockError::Config("bad".to_string()).is_retryable());
        assert!(
            LockError::StoreUnavailable(StoreError::Connection("refused".to_string()))
                .is_retryable()
        );
    }

    #[test]
    fn store_error_converts_into_store_unavailable() {
        let err: LockError = StoreError::Timeout("no reply within 250ms".to_string()).into();
        assert!(matches!(err, LockError::StoreUnavailable(StoreError::Timeout(_))));
        assert!(err.is_retryable());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LockError::Contended("job-42".to_string());
        assert_eq!(err.to_string(), "lock 'job-42' is held by another owner");

        let err = LockError::NotHeld("job-42".to_string());
        assert_eq!(err.to_string(), "lock 'job-42' is not held by this handle");

        let err = LockError::from(StoreError::Connection("connection reset".to_string()));
        assert_eq!(
            err.to_string(),
            "lock store unavailable: store connection failed: connection reset"
        );
    }
}
