//! Checkout Draft
//!
//! What the customer has typed so far. Lives as long as the checkout is open.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Package, PackageId};
use crate::currency::to_settlement_amount;

/// Country code every phone number must start with
pub const PHONE_PREFIX: &str = "+254";

/// Mutable, session-scoped customer input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraft {
    pub customer_name: String,
    pub customer_email: String,
    phone_number: String,
    selected_package_id: PackageId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_usd: Decimal,
}

impl CheckoutDraft {
    /// Fresh draft for a package, priced at its minimum
    pub fn new(package_id: PackageId) -> Self {
        Self {
            customer_name: String::new(),
            customer_email: String::new(),
            phone_number: PHONE_PREFIX.to_string(),
            selected_package_id: package_id,
            amount_usd: package_id.package().min_amount_usd,
        }
    }

    pub const fn selected_package_id(&self) -> PackageId {
        self.selected_package_id
    }

    pub fn package(&self) -> Package {
        self.selected_package_id.package()
    }

    /// Switch package. The amount always resets to the new package's minimum,
    /// even when re-selecting the current one.
    pub fn select_package(&mut self, package_id: PackageId) {
        self.selected_package_id = package_id;
        self.amount_usd = package_id.package().min_amount_usd;
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Input that drops the country code snaps back to the bare prefix
    pub fn set_phone_number(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.phone_number = if value.starts_with(PHONE_PREFIX) {
            value
        } else {
            PHONE_PREFIX.to_string()
        };
    }

    /// USD amount that will actually be charged. Fixed-price packages
    /// always charge their list price whatever `amount_usd` holds.
    pub fn charge_amount_usd(&self) -> Decimal {
        let package = self.package();
        if package.is_fixed {
            package.min_amount_usd
        } else {
            self.amount_usd
        }
    }

    /// Amount in whole settlement units, as shown on the pay button
    pub fn settlement_amount(&self) -> i64 {
        to_settlement_amount(self.charge_amount_usd())
    }

    /// First word of the name, and the rest if any
    pub fn split_name(&self) -> (String, Option<String>) {
        let mut parts = self.customer_name.trim().split(' ');
        let first = parts.next().unwrap_or_default().to_string();
        let rest = parts.collect::<Vec<_>>().join(" ");
        (first, (!rest.is_empty()).then_some(rest))
    }
}

impl Default for CheckoutDraft {
    fn default() -> Self {
        Self::new(PackageId::default())
    }
}
