//! # Checkout Error Types
//!
//! Typed error handling for the fashion-checkout flow.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (malformed URL, unusable credentials)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request payload failed JSON encoding
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network failure or timeout talking to the merchant API
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response was not the JSON shape the API contract promises
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Well-formed response indicating the order was not accepted
    #[error("Order rejected: fraud_status={fraud_status}")]
    OrderRejected { fraud_status: String },

    /// Operation invoked without the required prior state
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl CheckoutError {
    /// Returns true if this error ends the current checkout attempt.
    ///
    /// Precondition failures leave the attempt untouched so the caller can
    /// correct usage and retry the same operation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CheckoutError::Precondition(_))
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors() {
        assert!(CheckoutError::Transport("timeout".into()).is_terminal());
        assert!(CheckoutError::Protocol("missing client_token".into()).is_terminal());
        assert!(CheckoutError::OrderRejected {
            fraud_status: "REJECTED".into()
        }
        .is_terminal());
        assert!(!CheckoutError::Precondition("no authorization token".into()).is_terminal());
    }

    #[test]
    fn test_error_display() {
        let err = CheckoutError::OrderRejected {
            fraud_status: "PENDING".into(),
        };
        assert_eq!(err.to_string(), "Order rejected: fraud_status=PENDING");
    }
}
