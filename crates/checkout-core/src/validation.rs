//! Form Validation
//!
//! Checks every field of a [`CheckoutDraft`] and reports all problems at
//! once so the form can highlight each invalid input together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::{CheckoutDraft, PHONE_PREFIX};

const PHONE_DIGITS: usize = 9;
const MIN_NAME_CHARS: usize = 2;

/// Form fields that can carry an error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Amount,
}

/// Outcome of validating a draft
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub field_errors: BTreeMap<Field, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: Field) {
        self.field_errors.remove(&field);
    }
}

/// Validate all fields of a draft
pub fn validate(draft: &CheckoutDraft) -> ValidationReport {
    let mut field_errors = BTreeMap::new();

    if draft.customer_name.trim().chars().count() < MIN_NAME_CHARS {
        field_errors.insert(Field::Name, "Please enter your full name".to_string());
    }

    if !is_valid_email(&draft.customer_email) {
        field_errors.insert(Field::Email, "Please enter a valid email address".to_string());
    }

    if !is_valid_phone(draft.phone_number()) {
        field_errors.insert(
            Field::Phone,
            format!("Enter {PHONE_DIGITS} digits after {PHONE_PREFIX} (e.g., +254712345678)"),
        );
    }

    let package = draft.package();
    if !package.is_fixed && !package.contains(draft.amount_usd) {
        field_errors.insert(
            Field::Amount,
            format!(
                "Amount must be between ${} and ${}",
                package.min_amount_usd.normalize(),
                package.max_amount_usd.normalize()
            ),
        );
    }

    ValidationReport { field_errors }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with characters on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Country code followed by exactly nine digits, whitespace ignored
pub fn is_valid_phone(phone: &str) -> bool {
    let Some(rest) = phone.trim_start().strip_prefix(PHONE_PREFIX) else {
        return false;
    };

    let digits: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == PHONE_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PackageId;
    use rust_decimal_macros::dec;

    fn valid_draft() -> CheckoutDraft {
        let mut draft = CheckoutDraft::new(PackageId::Starter);
        draft.customer_name = "John Doe".into();
        draft.customer_email = "john@example.com".into();
        draft.set_phone_number("+254712345678");
        draft
    }

    #[test]
    fn test_valid_draft_passes() {
        let report = validate(&valid_draft());
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn test_reports_every_field_at_once() {
        let mut draft = CheckoutDraft::new(PackageId::Growth);
        draft.customer_name = " J ".into();
        draft.customer_email = "not-an-email".into();
        draft.set_phone_number("+254123");
        draft.amount_usd = dec!(10);

        let report = validate(&draft);
        assert!(!report.is_valid());
        assert_eq!(report.field_errors.len(), 4);
        assert_eq!(
            report.error(Field::Amount),
            Some("Amount must be between $625 and $1250")
        );
    }

    #[test]
    fn test_phone_rules() {
        assert!(!is_valid_phone("+254123"));
        assert!(is_valid_phone("+254712345678"));
        assert!(is_valid_phone("+254 712 345 678"));
        assert!(!is_valid_phone("+2547123456789"));
        assert!(!is_valid_phone("+25471234567a"));
        assert!(!is_valid_phone("0712345678"));
    }

    #[test]
    fn test_email_rules() {
        assert!(!is_valid_email("not-an-email"));
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("j.doe@mail.example.co.ke"));
        assert!(!is_valid_email("john@@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john@example."));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jo hn@example.com"));
    }

    #[test]
    fn test_fixed_package_ignores_amount() {
        let mut draft = valid_draft();
        draft.select_package(PackageId::AiAudit);

        for amount in [dec!(-1), dec!(0), dec!(149.99), dec!(1000000)] {
            draft.amount_usd = amount;
            assert_eq!(validate(&draft).error(Field::Amount), None);
        }
    }

    #[test]
    fn test_amount_bounds_inclusive() {
        let mut draft = valid_draft();
        draft.amount_usd = dec!(250);
        assert!(validate(&draft).is_valid());
        draft.amount_usd = dec!(500);
        assert!(validate(&draft).is_valid());
        draft.amount_usd = dec!(500.01);
        assert!(!validate(&draft).is_valid());
    }
}
