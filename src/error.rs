//! Centralized error handling.
//!
//! Every fallible operation in this crate returns `Result<T, Error>`. There
//! are no panics on well-formed-but-rejected input and no sentinel values
//! (no NaN-like "failure" integers) — callers get an `Err` they can match on.

use thiserror::Error;

/// The crate's single error type, covering every failure kind the public
/// API can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A precondition was violated: a non-positive modulus, a zero-or-negative
    /// bit/byte length, mismatched CRT array lengths, and similar.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// `mod_inverse` (or `mod_pow` with a negative exponent) was asked for an
    /// inverse that does not exist because `gcd(a, n) != 1`.
    #[error("no modular inverse exists (gcd != 1)")]
    NoInverse,

    /// The OS cryptographically secure RNG is unavailable or returned an
    /// error while being read.
    #[error("entropy source unavailable: {message}")]
    EntropyFailure { message: String },

    /// A primality worker thread failed unexpectedly; the enclosing
    /// `prime`/`prime_sync` call fails rather than silently dropping a
    /// worker.
    #[error("primality worker failed: {message}")]
    WorkerFailure { message: String },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn entropy_failure(message: impl Into<String>) -> Self {
        Error::EntropyFailure {
            message: message.into(),
        }
    }

    pub(crate) fn worker_failure(message: impl Into<String>) -> Self {
        Error::WorkerFailure {
            message: message.into(),
        }
    }
}
