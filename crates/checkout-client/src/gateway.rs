//! Hosted Payment Gateway
//!
//! The customer pays inside a popup owned by the payment provider. This
//! module describes what we hand that popup and the single outcome it
//! reports back per attempt.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use checkout_core::{CheckoutDraft, PackageId, Result, TransactionReference};
use checkout_core::currency::{to_minor_units, SETTLEMENT_CURRENCY};

/// Reconciliation data attached to the charge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeMetadata {
    pub package_id: PackageId,
    pub package_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_usd: Decimal,
    pub customer_name: String,
    pub customer_phone: String,
}

/// Everything the hosted widget needs to start a charge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub public_key: String,
    pub customer_email: String,
    /// Settlement amount in the currency's smallest unit
    pub amount_in_smallest_unit: i64,
    pub currency: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub phone: String,
    pub reference: TransactionReference,
    pub metadata: ChargeMetadata,
}

impl GatewayRequest {
    /// Build the widget request for a validated draft
    pub fn from_draft(
        draft: &CheckoutDraft,
        public_key: &str,
        reference: TransactionReference,
    ) -> Self {
        let package = draft.package();
        let (first_name, last_name) = draft.split_name();

        Self {
            public_key: public_key.to_string(),
            customer_email: draft.customer_email.clone(),
            amount_in_smallest_unit: to_minor_units(draft.settlement_amount()),
            currency: SETTLEMENT_CURRENCY.to_string(),
            first_name,
            last_name,
            phone: draft.phone_number().to_string(),
            reference,
            metadata: ChargeMetadata {
                package_id: package.id,
                package_name: package.name.to_string(),
                amount_usd: draft.charge_amount_usd(),
                customer_name: draft.customer_name.clone(),
                customer_phone: draft.phone_number().to_string(),
            },
        }
    }
}

/// Transaction reported by the widget's success callback.
///
/// Advisory only: it must be confirmed by the verification endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayTransaction {
    pub reference: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Gateway-side transaction id
    #[serde(default)]
    pub transaction: Option<String>,
}

/// Exactly one of these is reported per attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayOutcome {
    Success(GatewayTransaction),
    Cancelled,
    Failed { message: Option<String> },
}

/// Payment gateway client
///
/// `Err` means the popup never opened (script load failure, SDK missing).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn open(&self, request: GatewayRequest) -> Result<GatewayOutcome>;
}

/// The provider's embeddable widget.
///
/// `load` injects the provider script; `new_transaction` shows the popup and
/// resolves once the customer pays, cancels, or the widget fails.
#[async_trait]
pub trait HostedWidget: Send + Sync {
    async fn load(&self) -> Result<()>;

    async fn new_transaction(&self, request: GatewayRequest) -> Result<GatewayOutcome>;
}

/// Gateway that loads its widget on first use.
///
/// Concurrent first uses share one load. A failed load is not cached, so the
/// next attempt tries again.
pub struct LazyGateway<W> {
    widget: W,
    loaded: OnceCell<()>,
}

impl<W: HostedWidget> LazyGateway<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            loaded: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }
}

#[async_trait]
impl<W: HostedWidget> PaymentGateway for LazyGateway<W> {
    async fn open(&self, request: GatewayRequest) -> Result<GatewayOutcome> {
        self.loaded
            .get_or_try_init(|| async {
                tracing::debug!("Loading hosted payment widget");
                self.widget.load().await
            })
            .await?;

        tracing::info!(reference = %request.reference, "Opening payment popup");
        self.widget.new_transaction(request).await
    }
}
