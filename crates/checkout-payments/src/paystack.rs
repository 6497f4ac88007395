//! Paystack Transaction Lookup
//!
//! Reads the gateway's authoritative record for a reference via
//! `GET /transaction/verify/{reference}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{Result, VerificationError};

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// Gateway connection settings
#[derive(Clone, Debug)]
pub struct PaystackConfig {
    /// Secret key for the verification API
    pub secret_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PaystackConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
        }
    }
}

impl PaystackConfig {
    pub fn from_env() -> Self {
        let secret_key = std::env::var("PAYSTACK_SECRET_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url = std::env::var("PAYSTACK_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout_secs = std::env::var("PAYSTACK_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(30);

        Self {
            secret_key,
            base_url,
            timeout_secs,
        }
    }
}

/// Body of the verify call
#[derive(Clone, Debug, Deserialize)]
pub struct VerifyEnvelope {
    /// Whether the API request itself succeeded
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<GatewayTransactionRecord>,
}

/// The gateway's record of one transaction
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayTransactionRecord {
    pub reference: String,
    /// Smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channel: Option<String>,
    /// Human-readable outcome, e.g. "Approved" or "Insufficient Funds"
    #[serde(default)]
    pub gateway_response: Option<String>,
    #[serde(default)]
    pub customer: Option<GatewayCustomer>,
    #[serde(default, deserialize_with = "deserialize_metadata")]
    pub metadata: Option<TransactionMetadata>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GatewayCustomer {
    #[serde(default)]
    pub email: Option<String>,
}

/// Checkout metadata echoed back by the gateway
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMetadata {
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

/// Metadata shapes the gateway is known to send, tried in order
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMetadata {
    Object(TransactionMetadata),
    Encoded(String),
}

fn deserialize_metadata<'de, D>(deserializer: D) -> std::result::Result<Option<TransactionMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawMetadata>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMetadata::Object(metadata)) => Ok(Some(metadata)),
        Some(RawMetadata::Encoded(s)) if s.trim().is_empty() => Ok(None),
        Some(RawMetadata::Encoded(s)) => serde_json::from_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Decode a verify response body. Unknown shapes are errors, never guesses.
pub fn decode_envelope(body: &[u8]) -> Result<VerifyEnvelope> {
    serde_json::from_slice(body).map_err(|e| VerificationError::Decode(e.to_string()))
}

/// Source of authoritative transaction records
#[async_trait]
pub trait TransactionLookup: Send + Sync {
    async fn verify_transaction(&self, reference: &str) -> Result<VerifyEnvelope>;
}

/// Paystack API client
pub struct PaystackClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: reqwest::Url,
}

impl PaystackClient {
    pub fn new(secret_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| VerificationError::Config(format!("invalid gateway base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(VerificationError::Config(format!(
                "gateway base URL cannot hold a path: {base_url}"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerificationError::Config(e.to_string()))?;

        Ok(Self {
            http,
            secret_key: secret_key.to_string(),
            base_url,
        })
    }

    /// Build from config. Fails with [`VerificationError::NotConfigured`]
    /// when no secret key is set.
    pub fn from_config(config: &PaystackConfig) -> Result<Self> {
        let secret_key = config
            .secret_key
            .as_deref()
            .ok_or(VerificationError::NotConfigured)?;
        Self::new(
            secret_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// `{base}/transaction/verify/{reference}`, reference percent-encoded
    fn verify_url(&self, reference: &str) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["transaction", "verify", reference]);
        }
        url
    }
}

#[async_trait]
impl TransactionLookup for PaystackClient {
    async fn verify_transaction(&self, reference: &str) -> Result<VerifyEnvelope> {
        let url = self.verify_url(reference);
        tracing::debug!(reference, "Querying gateway transaction status");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| VerificationError::Gateway(e.to_string()))?;

        // Unknown references come back as 4xx with the usual envelope
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| VerificationError::Gateway(e.to_string()))?;

        decode_envelope(&body).map_err(|e| {
            tracing::error!(reference, http_status = %status, error = %e, "Unreadable gateway response");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PaystackClient {
        PaystackClient::new("sk_test_xxx", DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = PaystackConfig::default();
        assert_eq!(config.base_url, "https://api.paystack.co");
        assert_eq!(config.timeout_secs, 30);
        assert!(matches!(
            PaystackClient::from_config(&config),
            Err(VerificationError::NotConfigured)
        ));
    }

    #[test]
    fn test_verify_url_encodes_reference() {
        let client = client();
        assert_eq!(
            client.verify_url("SP-ai-audit-123-abc").as_str(),
            "https://api.paystack.co/transaction/verify/SP-ai-audit-123-abc"
        );
        assert_eq!(
            client.verify_url("a/b?c").as_str(),
            "https://api.paystack.co/transaction/verify/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            PaystackClient::new("sk", "not a url", Duration::from_secs(1)),
            Err(VerificationError::Config(_))
        ));
    }

    #[test]
    fn test_decode_success_record() {
        let body = br#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "id": 4099260516,
                "reference": "SP-ai-audit-123-abc",
                "amount": 1932100,
                "currency": "KES",
                "status": "success",
                "paid_at": "2026-02-10T09:15:02.000Z",
                "paidAt": "2026-02-10T09:15:02.000Z",
                "channel": "mobile_money",
                "gateway_response": "Approved",
                "customer": {"id": 1, "email": "john@example.com"},
                "metadata": {"packageId": "ai-audit", "amountUSD": 150, "custom_fields": []}
            }
        }"#;

        let envelope = decode_envelope(body).unwrap();
        assert!(envelope.status);
        let tx = envelope.data.unwrap();
        assert_eq!(tx.amount, 1_932_100);
        assert!(tx.paid_at.is_some());
        assert_eq!(tx.customer.and_then(|c| c.email).as_deref(), Some("john@example.com"));
        assert_eq!(tx.metadata.and_then(|m| m.package_id).as_deref(), Some("ai-audit"));
    }

    #[test]
    fn test_decode_metadata_shapes() {
        let record = |metadata: &str| {
            let body = format!(
                r#"{{"status":true,"data":{{"reference":"r","amount":1,"currency":"KES","status":"success","metadata":{metadata}}}}}"#
            );
            decode_envelope(body.as_bytes()).map(|e| e.data.and_then(|d| d.metadata))
        };

        assert_eq!(record("null").unwrap(), None);
        assert_eq!(record(r#""""#).unwrap(), None);
        assert_eq!(
            record(r#""{\"packageId\":\"growth\"}""#).unwrap().and_then(|m| m.package_id),
            Some("growth".into())
        );
        assert!(record("42").is_err());
        assert!(record(r#""not json""#).is_err());
    }

    #[test]
    fn test_decode_failure_envelope() {
        let envelope =
            decode_envelope(br#"{"status": false, "message": "Transaction reference not found"}"#)
                .unwrap();
        assert!(!envelope.status);
        assert!(envelope.data.is_none());

        assert!(matches!(
            decode_envelope(b"<html>Bad Gateway</html>"),
            Err(VerificationError::Decode(_))
        ));
    }
}
