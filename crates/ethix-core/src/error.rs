//! # Checkout Error Types
//!
//! Typed error handling for the ethix-checkout orchestrator.
//! Submission and polling failures never escape the caller-facing API as
//! errors; they are converted to an [`ErrorResponse`](crate::ErrorResponse)
//! and delivered through the failure callback.

use crate::outcome::ErrorCode;
use thiserror::Error;

/// Failure while creating a payment on the remote API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The create endpoint answered with a non-success status
    #[error("HTTP Error: {0}")]
    HttpStatus(u16),

    /// The response body did not match the expected shape
    #[error("Malformed payment response: {0}")]
    Parse(String),

    /// Connection refused, DNS failure, timeout, etc.
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Failure during a single invoice status lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// The result endpoint answered with a non-success status
    #[error("Poll Error: {0}")]
    HttpStatus(u16),

    /// The invoice details body did not match the expected shape
    #[error("Malformed invoice details: {0}")]
    Parse(String),

    /// Connection refused, DNS failure, timeout, etc.
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Rejected cart mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Quantity for {name} must be a positive integer")]
    ZeroQuantity { name: String },
}

/// Umbrella error for everything that is not a delivered outcome
#[derive(Debug, Error)]
pub enum EthixError {
    /// Configuration errors (missing keys, invalid environment)
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EthixError {
    /// Stable error code reported to the caller, if this error is ever
    /// surfaced through a failure callback.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            EthixError::Submission(_) => Some(ErrorCode::FetchFailed),
            EthixError::Poll(_) => Some(ErrorCode::PollFailed),
            _ => None,
        }
    }
}

/// Result type alias for checkout operations
pub type EthixResult<T> = Result<T, EthixError>;
