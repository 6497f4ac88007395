//! Transaction References
//!
//! One reference per charge attempt, formatted
//! `SP-{package}-{unix millis}-{suffix}`. The suffix comes from a v4 UUID so
//! two attempts in the same millisecond still differ.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::PackageId;

/// Prefix on every reference this site mints
pub const REFERENCE_PREFIX: &str = "SP";

const SUFFIX_LEN: usize = 12;

/// Opaque attempt identifier shared by client, gateway and verifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionReference(String);

impl TransactionReference {
    /// Mint a reference for a new charge attempt
    pub fn generate(package_id: PackageId) -> Self {
        Self::generate_at(package_id, Utc::now().timestamp_millis())
    }

    /// Mint a reference with an explicit timestamp
    pub fn generate_at(package_id: PackageId, timestamp_millis: i64) -> Self {
        let entropy = uuid::Uuid::new_v4().simple().to_string();
        Self(format!(
            "{REFERENCE_PREFIX}-{package_id}-{timestamp_millis}-{}",
            &entropy[..SUFFIX_LEN]
        ))
    }

    /// Wrap a reference received from elsewhere
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_format() {
        let reference = TransactionReference::generate_at(PackageId::AiAudit, 1_700_000_000_000);
        let s = reference.as_str();
        assert!(s.starts_with("SP-ai-audit-1700000000000-"), "{s}");
        assert_eq!(s.rsplit('-').next().map(str::len), Some(SUFFIX_LEN));
    }

    #[test]
    fn test_same_millisecond_references_differ() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let reference = TransactionReference::generate_at(PackageId::Growth, 42);
            assert!(seen.insert(reference), "duplicate reference");
        }
    }
}
