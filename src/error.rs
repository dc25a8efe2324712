//! Error types for the CRM client layer.
//!
//! Errors are classified by where they surface:
//! - `ApiError`: fetching or submitting records against the remote API
//! - `FormError`: the outcome of a form submit attempt
//!
//! Malformed local session state is not an error at all — it reads as an
//! empty scope set (see `session`). Unresolvable record references are
//! rendered as "N/A" by the derived views, never raised.

use thiserror::Error;

/// Failure while talking to the remote record API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status. `message` is the
    /// server-provided text when the body carried one.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The response body did not decode into the expected record shape.
    #[error("Failed to decode record: {0}")]
    Decode(String),
}

impl ApiError {
    /// Returns true if retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode(_) => false,
        }
    }
}

/// The outcome of a failed form submit.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    /// A required field was empty. The submit never reached the network.
    #[error("{0}")]
    Validation(String),

    /// The create/update request itself failed. Entered values are kept
    /// on the form so the user can retry.
    #[error("{0}")]
    Submit(String),
}
