//! # checkout-client
//!
//! Drives one checkout attempt from the customer's form to a confirmed
//! payment.
//!
//! ## Checkout lifecycle
//!
//! ```text
//!            submit (invalid)
//!              ┌──────┐
//!              ▼      │
//!          ┌────────────┐  submit (valid)  ┌──────────────┐  verified  ┌───────────┐
//!   open ─▶│    Form    │─────────────────▶│  Processing  │───────────▶│  Success  │
//!          └────────────┘                  └──────────────┘            └───────────┘
//!             ▲      ▲        cancel             │
//!             │      └───────────────────────────┤
//!             │ retry                            │ gateway error /
//!          ┌────────────┐                        │ verification failed
//!          │   Error    │◀───────────────────────┘
//!          └────────────┘
//! ```
//!
//! The gateway popup reporting success is never enough on its own: the
//! session only reaches `Success` after the verification endpoint has
//! re-checked the transaction with the gateway.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_client::{CheckoutConfig, CheckoutController, HttpVerificationClient};
//!
//! let config = CheckoutConfig::from_env();
//! let verifier = Arc::new(HttpVerificationClient::new(&config.verify_url));
//! let mut checkout = CheckoutController::new(config, gateway, verifier, host);
//!
//! checkout.open(Some(PackageId::Starter))?;
//! checkout.session_mut().unwrap().edit_draft(|d| d.customer_name = "Jane Doe".into())?;
//! checkout.submit().await?;
//! ```

pub mod config;
pub mod controller;
pub mod gateway;
pub mod session;
pub mod verifier;

pub use config::CheckoutConfig;
pub use controller::{CheckoutController, NoopPageHost, PageHost};
pub use gateway::{
    ChargeMetadata, GatewayOutcome, GatewayRequest, GatewayTransaction, HostedWidget,
    LazyGateway, PaymentGateway,
};
pub use session::{CheckoutSession, CheckoutState, PaymentSummary};
pub use verifier::{HttpVerificationClient, VerificationClient};

pub use checkout_core::{CheckoutError, Result};
