//! Package Catalog
//!
//! The closed set of consulting packages on sale, their USD price bands,
//! and the server-side tolerance check against settled amounts.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::to_settlement_amount;
use crate::error::{CheckoutError, Result};

/// Allowed drift between a settled amount and the package band.
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.02);

/// Package identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageId {
    AiAudit,
    Starter,
    Growth,
    Enterprise,
}

impl PackageId {
    /// Display order on the pricing page and in the package picker
    pub const ALL: [Self; 4] = [Self::AiAudit, Self::Starter, Self::Growth, Self::Enterprise];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AiAudit => "ai-audit",
            Self::Starter => "starter",
            Self::Growth => "growth",
            Self::Enterprise => "enterprise",
        }
    }

    /// Catalog entry for this id
    pub fn package(self) -> Package {
        match self {
            Self::AiAudit => Package {
                id: self,
                name: "AI Audit Only",
                description: "60-minute consultation",
                min_amount_usd: dec!(150),
                max_amount_usd: dec!(150),
                is_fixed: true,
            },
            Self::Starter => Package {
                id: self,
                name: "Starter Automation",
                description: "Single workflow automation",
                min_amount_usd: dec!(250),
                max_amount_usd: dec!(500),
                is_fixed: false,
            },
            Self::Growth => Package {
                id: self,
                name: "Growth Package",
                description: "3-5 interconnected automations",
                min_amount_usd: dec!(625),
                max_amount_usd: dec!(1250),
                is_fixed: false,
            },
            Self::Enterprise => Package {
                id: self,
                name: "Enterprise Suite",
                description: "Complete business automation overhaul",
                min_amount_usd: dec!(2500),
                max_amount_usd: dec!(5000),
                is_fixed: false,
            },
        }
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::AiAudit
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageId {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CheckoutError::PackageNotFound(s.to_string()))
    }
}

/// An immutable catalog entry. Amounts are USD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: PackageId,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_amount_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_amount_usd: Decimal,
    /// Fixed-price packages have no amount slider
    pub is_fixed: bool,
}

impl Package {
    /// Whether a USD amount falls inside this package's band
    pub fn contains(&self, amount_usd: Decimal) -> bool {
        amount_usd >= self.min_amount_usd && amount_usd <= self.max_amount_usd
    }

    /// `$150` for fixed packages, `$250–$500` otherwise
    pub fn price_label(&self) -> String {
        if self.is_fixed {
            format!("${}", self.min_amount_usd.normalize())
        } else {
            format!(
                "${}–${}",
                self.min_amount_usd.normalize(),
                self.max_amount_usd.normalize()
            )
        }
    }

    /// USD increment for the amount slider
    pub fn slider_step(&self) -> Decimal {
        if self.max_amount_usd >= dec!(2500) {
            dec!(100)
        } else {
            dec!(25)
        }
    }
}

/// Look up a package by its wire id
pub fn get_package(id: &str) -> Result<Package> {
    id.parse::<PackageId>().map(PackageId::package)
}

/// All packages in display order
pub fn ordered() -> Vec<Package> {
    PackageId::ALL.into_iter().map(PackageId::package).collect()
}

/// Check a settled amount (settlement currency, display unit) against the
/// package band widened by [`AMOUNT_TOLERANCE`] on each side.
///
/// Unknown package ids are never within tolerance.
pub fn is_amount_within_tolerance(package_id: &str, settlement_amount: Decimal) -> bool {
    let Ok(package) = get_package(package_id) else {
        return false;
    };

    let min = Decimal::from(to_settlement_amount(package.min_amount_usd));
    let max = Decimal::from(to_settlement_amount(package.max_amount_usd));

    settlement_amount >= min * (Decimal::ONE - AMOUNT_TOLERANCE)
        && settlement_amount <= max * (Decimal::ONE + AMOUNT_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_bounds_are_consistent() {
        for package in ordered() {
            assert!(package.min_amount_usd <= package.max_amount_usd, "{}", package.id);
            if package.is_fixed {
                assert_eq!(package.min_amount_usd, package.max_amount_usd, "{}", package.id);
            }
        }
    }

    #[test]
    fn test_get_package() {
        let pkg = get_package("growth").unwrap();
        assert_eq!(pkg.name, "Growth Package");
        assert_eq!(pkg.min_amount_usd, dec!(625));

        assert_eq!(
            get_package("platinum"),
            Err(CheckoutError::PackageNotFound("platinum".into()))
        );
    }

    #[test]
    fn test_package_id_wire_format() {
        let json = serde_json::to_string(&PackageId::AiAudit).unwrap();
        assert_eq!(json, "\"ai-audit\"");
        let parsed: PackageId = serde_json::from_str("\"enterprise\"").unwrap();
        assert_eq!(parsed, PackageId::Enterprise);
    }

    #[test]
    fn test_tolerance_band() {
        let audit = Decimal::from(to_settlement_amount(dec!(150)));
        assert!(is_amount_within_tolerance("ai-audit", audit));
        assert!(!is_amount_within_tolerance("ai-audit", audit * dec!(0.5)));

        // 1% drift is absorbed, 3% is not
        assert!(is_amount_within_tolerance("ai-audit", audit * dec!(1.01)));
        assert!(!is_amount_within_tolerance("ai-audit", audit * dec!(1.03)));
    }

    #[test]
    fn test_tolerance_unknown_package() {
        assert!(!is_amount_within_tolerance("nope", dec!(19322)));
    }

    #[test]
    fn test_labels_and_steps() {
        assert_eq!(PackageId::AiAudit.package().price_label(), "$150");
        assert_eq!(PackageId::Starter.package().price_label(), "$250–$500");
        assert_eq!(PackageId::Starter.package().slider_step(), dec!(25));
        assert_eq!(PackageId::Enterprise.package().slider_step(), dec!(100));
    }
}
