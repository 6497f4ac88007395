//! HTTP Handlers

use axum::{body::Bytes, extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use checkout_core::catalog::{self, Package};
use checkout_core::currency::{to_settlement_amount, SETTLEMENT_CURRENCY, USD_TO_KES_RATE};
use checkout_core::VerifyPaymentResponse;
use checkout_payments::VerificationError;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub verification_configured: bool,
}

/// Catalog entry with prices in the settlement currency
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageView {
    #[serde(flatten)]
    pub package: Package,
    pub price_label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub slider_step: Decimal,
    pub min_settlement_amount: i64,
    pub max_settlement_amount: i64,
    pub currency: &'static str,
}

impl From<Package> for PackageView {
    fn from(package: Package) -> Self {
        Self {
            price_label: package.price_label(),
            slider_step: package.slider_step(),
            min_settlement_amount: to_settlement_amount(package.min_amount_usd),
            max_settlement_amount: to_settlement_amount(package.max_amount_usd),
            currency: SETTLEMENT_CURRENCY,
            package,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfigResponse {
    pub public_key: Option<String>,
    pub currency: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_to_kes_rate: Decimal,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        verification_configured: state.verifier.is_configured(),
    })
}

/// Package catalog in display order
pub async fn list_packages() -> Json<Vec<PackageView>> {
    Json(catalog::ordered().into_iter().map(PackageView::from).collect())
}

/// Public settings the browser needs to open the hosted widget
pub async fn checkout_config(State(state): State<AppState>) -> Json<CheckoutConfigResponse> {
    Json(CheckoutConfigResponse {
        public_key: state.public_key.as_deref().map(str::to_string),
        currency: SETTLEMENT_CURRENCY,
        usd_to_kes_rate: USD_TO_KES_RATE,
    })
}

/// Verify a payment reference with the gateway.
///
/// The body is read raw so a malformed or mistyped `reference` gets the same
/// 400 answer as a missing one.
pub async fn verify_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VerifyPaymentResponse>, VerificationError> {
    let reference = reference_from_body(&body).ok_or(VerificationError::MissingReference)?;

    let payment = state.verifier.verify(&reference).await?;

    Ok(Json(VerifyPaymentResponse::verified(payment)))
}

fn reference_from_body(body: &[u8]) -> Option<String> {
    let payload: Value = serde_json::from_slice(body).ok()?;
    payload
        .get("reference")
        .and_then(Value::as_str)
        .map(str::to_string)
}
