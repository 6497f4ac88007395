//! Verification Client
//!
//! Asks our own verification endpoint whether a reference really settled.

use async_trait::async_trait;

use checkout_core::{
    CheckoutError, Result, TransactionReference, VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Server-side verification of a gateway reference
#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// `Ok` carries the endpoint's verdict, including rejections.
    /// `Err` means no trustworthy verdict was obtained.
    async fn verify(&self, reference: &TransactionReference) -> Result<VerifyPaymentResponse>;
}

/// Calls `POST /api/verify-payment` over HTTP
pub struct HttpVerificationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpVerificationClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VerificationClient for HttpVerificationClient {
    async fn verify(&self, reference: &TransactionReference) -> Result<VerifyPaymentResponse> {
        let body = VerifyPaymentRequest {
            reference: reference.to_string(),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| CheckoutError::Verification(e.to_string()))?;

        // Rejections come back as 4xx/5xx with the same JSON body
        let status = response.status();
        let verdict: VerifyPaymentResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Verification(format!("HTTP {status}: {e}")))?;

        check_consistent(status.is_success(), verdict)
    }
}

/// A success verdict must arrive with a 2xx status and transaction data
fn check_consistent(status_ok: bool, verdict: VerifyPaymentResponse) -> Result<VerifyPaymentResponse> {
    if verdict.success && (!status_ok || verdict.data.is_none()) {
        return Err(CheckoutError::Verification(
            "success verdict without transaction data".into(),
        ));
    }
    Ok(verdict)
}
