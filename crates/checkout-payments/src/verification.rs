//! Verification Service
//!
//! Turns a client-supplied reference into an authoritative verdict. Amount
//! and currency always come from the gateway's record, never from the
//! client.

use std::sync::Arc;

use checkout_core::catalog::is_amount_within_tolerance;
use checkout_core::currency::{from_minor_units, SETTLEMENT_CURRENCY};
use checkout_core::{PackageId, VerifiedPayment};

use crate::error::{Result, VerificationError};
use crate::paystack::{GatewayTransactionRecord, TransactionLookup, VerifyEnvelope};
use crate::reconciliation::{AmountMismatch, LogReconciliation, ReconciliationHandler};

const SUCCESS_STATUS: &str = "success";
const GENERIC_REJECTION: &str = "Payment verification failed";

/// Server-side payment verification
pub struct VerificationService {
    lookup: Option<Arc<dyn TransactionLookup>>,
    handlers: Vec<Arc<dyn ReconciliationHandler>>,
}

impl VerificationService {
    /// `None` lookup means no gateway secret is configured; every call then
    /// fails with [`VerificationError::NotConfigured`].
    pub fn new(lookup: Option<Arc<dyn TransactionLookup>>) -> Self {
        Self {
            lookup,
            handlers: vec![Arc::new(LogReconciliation)],
        }
    }

    /// Subscribe to amount mismatches
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn ReconciliationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub const fn is_configured(&self) -> bool {
        self.lookup.is_some()
    }

    /// Verify a reference against the gateway.
    ///
    /// Safe to repeat: nothing is recorded, the gateway is simply asked
    /// again.
    pub async fn verify(&self, reference: &str) -> Result<VerifiedPayment> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(VerificationError::MissingReference);
        }

        let Some(lookup) = self.lookup.as_ref() else {
            tracing::error!("PAYSTACK_SECRET_KEY is not configured");
            return Err(VerificationError::NotConfigured);
        };

        let envelope = lookup.verify_transaction(reference).await.inspect_err(|e| {
            tracing::error!(reference, error = %e, "Gateway verification call failed");
        })?;

        let tx = successful_transaction(envelope).inspect_err(|e| {
            tracing::warn!(reference, error = %e, "Gateway did not confirm payment");
        })?;

        let amount = from_minor_units(tx.amount);

        if tx.currency != SETTLEMENT_CURRENCY {
            tracing::warn!(
                reference,
                currency = %tx.currency,
                expected = SETTLEMENT_CURRENCY,
                "Payment settled in unexpected currency"
            );
            return Err(VerificationError::CurrencyMismatch {
                expected: SETTLEMENT_CURRENCY.to_string(),
                actual: tx.currency,
            });
        }

        let package_id = tx
            .metadata
            .as_ref()
            .and_then(|m| m.package_id.as_deref());
        match package_id.map(str::parse::<PackageId>) {
            Some(Ok(package_id)) if !is_amount_within_tolerance(package_id.as_str(), amount) => {
                self.report_mismatch(&AmountMismatch {
                    reference: tx.reference.clone(),
                    package_id,
                    amount,
                    currency: tx.currency.clone(),
                });
            }
            Some(Err(_)) => {
                tracing::debug!(reference, package = ?package_id, "Unknown package in metadata");
            }
            _ => {}
        }

        tracing::info!(reference, amount = %amount, channel = ?tx.channel, "Payment verified");

        Ok(VerifiedPayment {
            reference: tx.reference,
            amount,
            currency: tx.currency,
            status: tx.status,
            paid_at: tx.paid_at,
            channel: tx.channel,
            customer_email: tx.customer.and_then(|c| c.email),
        })
    }

    fn report_mismatch(&self, mismatch: &AmountMismatch) {
        for handler in &self.handlers {
            handler.on_amount_mismatch(mismatch);
        }
    }
}

/// Failed unless the request succeeded and the transaction itself reports
/// success.
fn successful_transaction(envelope: VerifyEnvelope) -> Result<GatewayTransactionRecord> {
    let VerifyEnvelope {
        status,
        message,
        data,
    } = envelope;

    match data {
        Some(tx) if status && tx.status == SUCCESS_STATUS => Ok(tx),
        Some(tx) => Err(rejection(tx.gateway_response)),
        None if !status => Err(rejection(message)),
        None => Err(rejection(None)),
    }
}

fn rejection(reason: Option<String>) -> VerificationError {
    VerificationError::Rejected {
        message: reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string()),
    }
}
