//! # checkout-payments
//!
//! Server-side confirmation that a checkout reference really settled.
//!
//! The browser's "payment succeeded" callback is only a hint. Before the
//! customer is told their payment went through, the verification endpoint
//! asks the gateway directly and cross-checks what it says:
//!
//! ```text
//! ┌──────────┐  reference   ┌──────────────────────┐  GET /transaction/verify/{ref}  ┌─────────┐
//! │  Client  │─────────────▶│ VerificationService  │────────────────────────────────▶│ Gateway │
//! └──────────┘              │  • status == success │◀────────────────────────────────└─────────┘
//!       ▲                   │  • currency == KES   │
//!       │  verdict          │  • amount ≈ package  │──▶ ReconciliationHandler (mismatch)
//!       └───────────────────└──────────────────────┘
//! ```
//!
//! Nothing is stored: every call re-reads the gateway's record, so repeated
//! verification of the same reference gives the same answer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_payments::{PaystackClient, PaystackConfig, VerificationService};
//!
//! let lookup = PaystackClient::from_config(&PaystackConfig::from_env()).ok();
//! let service = VerificationService::new(lookup.map(|c| Arc::new(c) as _));
//!
//! let payment = service.verify("SP-ai-audit-1700000000000-3f9c2a1b7d4e").await?;
//! ```

mod error;
mod paystack;
mod reconciliation;
mod verification;

pub use error::{Result, VerificationError};
pub use paystack::{
    decode_envelope, GatewayCustomer, GatewayTransactionRecord, PaystackClient, PaystackConfig,
    TransactionLookup, TransactionMetadata, VerifyEnvelope,
};
pub use reconciliation::{AmountMismatch, LogReconciliation, ReconciliationHandler};
pub use verification::VerificationService;
