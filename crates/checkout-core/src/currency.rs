//! Currency Conversion
//!
//! USD prices are shown on the site; the gateway charges in KES. The rate is
//! fixed and must be refreshed by hand when the market moves.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 1 USD in KES
pub const USD_TO_KES_RATE: Decimal = dec!(128.81);

/// ISO code of the currency the gateway settles in
pub const SETTLEMENT_CURRENCY: &str = "KES";

/// Smallest gateway units per whole settlement unit
pub const MINOR_UNITS: i64 = 100;

/// Convert a USD amount to whole settlement units, rounding half-up.
///
/// Client display and the server tolerance check both go through here so
/// they can never disagree on rounding. Amounts beyond `i64` saturate.
pub fn to_settlement_amount(usd: Decimal) -> i64 {
    let saturated = if usd.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    };

    usd.checked_mul(USD_TO_KES_RATE)
        .map(|kes| kes.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|kes| kes.to_i64())
        .unwrap_or(saturated)
}

/// Whole settlement units to the gateway's smallest unit
pub const fn to_minor_units(settlement_amount: i64) -> i64 {
    settlement_amount.saturating_mul(MINOR_UNITS)
}

/// Gateway smallest unit back to settlement display units
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_half_up() {
        // 150 × 128.81 = 19321.5
        assert_eq!(to_settlement_amount(dec!(150)), 19322);
        assert_eq!(to_settlement_amount(dec!(250)), 32203);
        assert_eq!(to_settlement_amount(dec!(0)), 0);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = i64::MIN;
        let mut usd = dec!(0);
        while usd <= dec!(5000) {
            let kes = to_settlement_amount(usd);
            assert!(kes >= previous, "not monotonic at {usd}");
            previous = kes;
            usd += dec!(12.5);
        }
    }

    #[test]
    fn test_saturates_instead_of_overflowing() {
        assert_eq!(to_settlement_amount(Decimal::MAX), i64::MAX);
        assert_eq!(to_settlement_amount(Decimal::MIN), i64::MIN);
        assert_eq!(to_settlement_amount(Decimal::from(i64::MAX)), i64::MAX);
        assert_eq!(to_minor_units(to_settlement_amount(Decimal::MAX)), i64::MAX);
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(19322), 1_932_200);
        assert_eq!(from_minor_units(1_932_100), dec!(19321));
        assert_eq!(from_minor_units(1_932_150), dec!(19321.5));
    }
}
