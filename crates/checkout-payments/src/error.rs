//! Verification Error Types

use checkout_core::VerifyPaymentResponse;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, VerificationError>;

/// Verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// Request had no usable reference
    #[error("Missing or invalid reference")]
    MissingReference,

    /// Gateway secret key absent
    #[error("Gateway secret key not configured")]
    NotConfigured,

    /// Gateway says the transaction did not succeed
    #[error("Transaction not successful: {message}")]
    Rejected { message: String },

    /// Charged in a currency we do not settle in
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    /// Gateway unreachable or timed out
    #[error("Gateway request failed: {0}")]
    Gateway(String),

    /// Gateway answered with a shape we do not understand
    #[error("Gateway response parse error: {0}")]
    Decode(String),

    /// Bad gateway configuration (base URL, HTTP client)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VerificationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// HTTP status for the verification endpoint
    pub const fn status(&self) -> u16 {
        match self {
            Self::MissingReference | Self::Rejected { .. } | Self::CurrencyMismatch { .. } => 400,
            Self::NotConfigured | Self::Gateway(_) | Self::Decode(_) | Self::Config(_) => 500,
        }
    }

    /// Message safe to show the customer. Internal detail stays in the logs.
    pub fn user_message(&self) -> &str {
        match self {
            Self::MissingReference => "Missing or invalid reference",
            Self::NotConfigured | Self::Config(_) => "Payment verification unavailable",
            Self::Rejected { message } => message,
            Self::CurrencyMismatch { .. } => "Invalid payment currency",
            Self::Gateway(_) | Self::Decode(_) => "An error occurred during verification",
        }
    }

    /// Failure body for the verification endpoint
    pub fn to_response(&self) -> VerifyPaymentResponse {
        VerifyPaymentResponse::failure(self.user_message())
    }
}

#[cfg(feature = "axum-handlers")]
impl axum::response::IntoResponse for VerificationError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self.to_response())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(VerificationError::MissingReference.status(), 400);
        assert_eq!(VerificationError::NotConfigured.status(), 500);
        assert_eq!(
            VerificationError::Rejected {
                message: "Declined".into()
            }
            .status(),
            400
        );
        assert_eq!(VerificationError::Gateway("timeout".into()).status(), 500);
    }

    #[test]
    fn test_user_messages_hide_detail() {
        let err = VerificationError::Decode("expected bool at line 1".into());
        assert_eq!(err.user_message(), "An error occurred during verification");

        let err = VerificationError::CurrencyMismatch {
            expected: "KES".into(),
            actual: "NGN".into(),
        };
        assert_eq!(err.to_response().message, "Invalid payment currency");
        assert!(!err.to_response().success);
    }
}
