//! Conversion between human decimal quantities and base units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::curve::SCALE;
use super::error::DomainError;

/// Decimal exponent shared by creator tokens, WSOL and the payroll token.
pub const TOKEN_DECIMALS: u32 = 9;

/// Convert a decimal quantity to base units.
///
/// # Errors
/// Rejects negative values, values with more than nine decimal places, and
/// values that do not fit in a `u64`.
pub fn to_base_units(amount: Decimal) -> Result<u64, DomainError> {
    let invalid = |reason| DomainError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(invalid("must not be negative"));
    }
    let scaled = amount
        .checked_mul(Decimal::from(SCALE as u64))
        .ok_or_else(|| invalid("too large"))?;
    if !scaled.fract().is_zero() {
        return Err(invalid("more than 9 decimal places"));
    }
    scaled.to_u64().ok_or_else(|| invalid("too large"))
}

/// Like [`to_base_units`] but also rejects zero.
///
/// # Errors
/// See [`to_base_units`]; additionally fails on zero.
pub fn to_positive_base_units(amount: Decimal) -> Result<u64, DomainError> {
    let units = to_base_units(amount)?;
    if units == 0 {
        return Err(DomainError::InvalidAmount {
            amount: amount.to_string(),
            reason: "must be greater than zero",
        });
    }
    Ok(units)
}

/// Express base units as a decimal quantity. `None` past `Decimal`'s range.
#[must_use]
pub fn to_decimal(units: u128) -> Option<Decimal> {
    let units = i128::try_from(units).ok()?;
    Decimal::try_from_i128_with_scale(units, TOKEN_DECIMALS)
        .ok()
        .map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_token_is_one_billion_units() {
        assert_eq!(to_base_units(dec!(1)).unwrap(), 1_000_000_000);
    }

    #[test]
    fn fractional_amounts_convert() {
        assert_eq!(to_base_units(dec!(0.5)).unwrap(), 500_000_000);
        assert_eq!(to_base_units(dec!(0.000000001)).unwrap(), 1);
    }

    #[test]
    fn sub_unit_precision_is_rejected() {
        assert!(to_base_units(dec!(0.0000000001)).is_err());
    }

    #[test]
    fn negative_is_rejected() {
        assert!(to_base_units(dec!(-1)).is_err());
    }

    #[test]
    fn zero_allowed_only_where_asked() {
        assert_eq!(to_base_units(dec!(0)).unwrap(), 0);
        assert!(to_positive_base_units(dec!(0)).is_err());
    }

    #[test]
    fn too_large_for_u64_is_rejected() {
        assert!(to_base_units(dec!(100000000000)).is_err());
    }

    #[test]
    fn base_units_render_as_decimal() {
        assert_eq!(to_decimal(51).unwrap(), dec!(0.000000051));
        assert_eq!(to_decimal(2_500_000_000).unwrap(), dec!(2.5));
    }
}
