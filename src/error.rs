//! Error types for lodestone

use thiserror::Error;

/// Main error type for lodestone
///
/// The only failure surfaced to callers is attempting to mutate a read-only
/// sequence. Out-of-range access yields `Value::Undefined`, and nullish or
/// non-sequence arguments to pure operations degrade to empty results rather
/// than failing.
#[derive(Error, Debug)]
pub enum Error {
    /// A mutating operation (pull family, remove, reverse) was applied to a
    /// sequence that cannot be mutated in place, such as a string.
    #[error("TypeError: cannot {operation} a {type_name}")]
    ImmutableInput {
        operation: String,
        type_name: &'static str,
    },

    /// Internal invariant violation in the scheduler
    #[error("InternalError: {0}")]
    Internal(String),
}

impl Error {
    /// Create an error for a mutating operation on a read-only sequence
    pub fn immutable_input(operation: impl Into<String>, type_name: &'static str) -> Self {
        Error::ImmutableInput {
            operation: operation.into(),
            type_name,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }
}

/// Result type alias for lodestone
pub type Result<T> = std::result::Result<T, Error>;
