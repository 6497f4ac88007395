//! Checkout Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Checkout-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Package id outside the catalog
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Operation not allowed in the current checkout step
    #[error("Cannot {action} while checkout is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// Hosted payment widget could not be loaded or started
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Verification endpoint unreachable or returned garbage
    #[error("Verification error: {0}")]
    Verification(String),

    /// Missing credential or endpoint
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CheckoutError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(_) | Self::Verification(_))
    }

    /// Get user-friendly message
    pub const fn user_message(&self) -> &str {
        match self {
            Self::PackageNotFound(_) => "The selected package is not available.",
            Self::InvalidTransition { .. } => "Please wait for the current payment to finish.",
            Self::Gateway(_) => "Could not initialize payment. Please try again.",
            Self::Verification(_) => {
                "Could not verify payment. Please contact support with your reference."
            }
            Self::Config(_) => "Payment configuration error. Please contact support.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_detail() {
        let err = CheckoutError::Config("PAYSTACK_PUBLIC_KEY not set".into());
        assert!(!err.user_message().contains("PAYSTACK"));
        assert!(err.to_string().contains("PAYSTACK_PUBLIC_KEY"));
    }

    #[test]
    fn test_retryable() {
        assert!(CheckoutError::Verification("timeout".into()).is_retryable());
        assert!(!CheckoutError::PackageNotFound("x".into()).is_retryable());
    }
}
