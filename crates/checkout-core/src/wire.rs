//! Verification Wire Types
//!
//! JSON shapes exchanged between the checkout client and the verification
//! endpoint. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/verify-payment`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
}

/// Normalized transaction record returned on verified success
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub reference: String,
    /// Settlement currency, display unit (not the gateway's smallest unit)
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub channel: Option<String>,
    pub customer_email: Option<String>,
}

/// Response of `POST /api/verify-payment`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VerifiedPayment>,
}

impl VerifyPaymentResponse {
    pub fn verified(data: VerifiedPayment) -> Self {
        Self {
            success: true,
            message: "Payment verified successfully".into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_failure_omits_data() {
        let json = serde_json::to_value(VerifyPaymentResponse::failure("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn test_verified_payload_shape() {
        let response = VerifyPaymentResponse::verified(VerifiedPayment {
            reference: "SP-ai-audit-1-abc".into(),
            amount: dec!(19321),
            currency: "KES".into(),
            status: "success".into(),
            paid_at: None,
            channel: Some("mobile_money".into()),
            customer_email: Some("john@example.com".into()),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"]["amount"].as_f64(), Some(19321.0));
        assert_eq!(json["data"]["customerEmail"], "john@example.com");
        assert!(json["data"]["paidAt"].is_null());

        let back: VerifyPaymentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
