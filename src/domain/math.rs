//! Checked 256-bit helpers for curve arithmetic.
//!
//! Every intermediate product in the curve formulas is carried in a `U256`
//! and narrowed back to `u128` at the end. Nothing here wraps.

use primitive_types::U256;

use super::error::PricingError;

type MathResult<T> = Result<T, PricingError>;

pub(crate) fn wide(value: u128) -> U256 {
    U256::from(value)
}

pub(crate) fn narrow(value: U256) -> MathResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(PricingError::ArithmeticOverflow);
    }
    Ok(value.low_u128())
}

pub(crate) fn add(a: U256, b: U256) -> MathResult<U256> {
    a.checked_add(b).ok_or(PricingError::ArithmeticOverflow)
}

pub(crate) fn mul(a: U256, b: U256) -> MathResult<U256> {
    a.checked_mul(b).ok_or(PricingError::ArithmeticOverflow)
}

pub(crate) fn div(a: U256, b: U256) -> MathResult<U256> {
    a.checked_div(b).ok_or(PricingError::ArithmeticOverflow)
}

/// `a * b / c`, rounded down.
pub(crate) fn mul_div(a: u128, b: u128, c: u128) -> MathResult<u128> {
    narrow(div(mul(wide(a), wide(b))?, wide(c))?)
}

/// `a * b / c`, rounded up.
pub(crate) fn mul_div_ceil(a: u128, b: u128, c: u128) -> MathResult<u128> {
    if c == 0 {
        return Err(PricingError::ArithmeticOverflow);
    }
    let product = mul(wide(a), wide(b))?;
    let divisor = wide(c);
    let quotient = product / divisor;
    let rounded = if (product % divisor).is_zero() {
        quotient
    } else {
        add(quotient, U256::one())?
    };
    narrow(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_down() {
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
    }

    #[test]
    fn mul_div_ceil_rounds_up_only_on_remainder() {
        assert_eq!(mul_div_ceil(7, 3, 2).unwrap(), 11);
        assert_eq!(mul_div_ceil(8, 3, 2).unwrap(), 12);
    }

    #[test]
    fn mul_div_survives_u128_sized_products() {
        let result = mul_div(u128::MAX, 4, 8).unwrap();
        assert_eq!(result, u128::MAX / 2);
    }

    #[test]
    fn narrow_rejects_values_past_u128() {
        let too_big = wide(u128::MAX) + U256::one();
        assert_eq!(narrow(too_big), Err(PricingError::ArithmeticOverflow));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(mul_div(1, 1, 0), Err(PricingError::ArithmeticOverflow));
        assert_eq!(mul_div_ceil(1, 1, 0), Err(PricingError::ArithmeticOverflow));
    }
}
