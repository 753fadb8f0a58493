//! Error types shared across the envelope.
//!
//! - [`BoxError`] - what external capabilities report
//! - [`TaskError`] - errors a transformation may return

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a transformation reports without panicking.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The input could not be read as UTF-8 text.
    #[error("invalid utf-8 input: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The transformation rejected its input.
    #[error("{0}")]
    Rejected(String),
}
