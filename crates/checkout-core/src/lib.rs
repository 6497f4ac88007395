//! # checkout-core
//!
//! Domain model for the consulting checkout: what can be bought, what it
//! costs in the settlement currency, and whether a customer's input is good
//! enough to hand to the payment gateway.
//!
//! ## Pricing pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────────────┐
//! │   Package    │───▶│  USD amount      │───▶│  KES whole units     │
//! │  (catalog)   │    │  (draft, slider) │    │  × 100 → gateway     │
//! └──────────────┘    └──────────────────┘    └──────────────────────┘
//!         │                                              │
//!         └──────────── tolerance band (±2%) ◀───────────┘
//!                       (server-side check)
//! ```
//!
//! Everything here is pure and synchronous: no network, no clock except
//! where a [`TransactionReference`] is minted.

pub mod catalog;
pub mod currency;
pub mod draft;
pub mod error;
pub mod reference;
pub mod validation;
pub mod wire;

pub use catalog::{Package, PackageId};
pub use currency::{SETTLEMENT_CURRENCY, USD_TO_KES_RATE};
pub use draft::CheckoutDraft;
pub use error::{CheckoutError, Result};
pub use reference::TransactionReference;
pub use validation::{Field, ValidationReport};
pub use wire::{VerifiedPayment, VerifyPaymentRequest, VerifyPaymentResponse};
