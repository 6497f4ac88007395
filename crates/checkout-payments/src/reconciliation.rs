//! Amount Reconciliation
//!
//! A settled charge that falls outside its package's tolerance band is not
//! reversed. It is reported here so someone can follow up by hand.

use rust_decimal::Decimal;
use serde::Serialize;

use checkout_core::PackageId;

/// A verified charge whose amount does not fit its package
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountMismatch {
    pub reference: String,
    pub package_id: PackageId,
    /// Settlement currency, display unit
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
}

/// Subscriber for post-charge discrepancies.
///
/// Handlers are notified after the verdict is fixed; they cannot change it.
pub trait ReconciliationHandler: Send + Sync {
    fn on_amount_mismatch(&self, mismatch: &AmountMismatch);
}

/// Writes mismatches to the log
pub struct LogReconciliation;

impl ReconciliationHandler for LogReconciliation {
    fn on_amount_mismatch(&self, mismatch: &AmountMismatch) {
        tracing::warn!(
            reference = %mismatch.reference,
            package = %mismatch.package_id,
            amount = %mismatch.amount,
            currency = %mismatch.currency,
            "Amount mismatch - needs manual reconciliation"
        );
    }
}
