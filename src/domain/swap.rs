//! Cross-curve swap estimation.
//!
//! A swap sells on the source curve and buys on the target curve without a
//! real intermediate currency transfer. The source sell fee and the target buy
//! fee both apply.

use serde::{Deserialize, Serialize};

use super::curve::{quote_sell, tokens_for_currency, CurveState, BPS_DENOMINATOR};
use super::error::PricingError;
use super::math::mul_div;

/// Estimated result of a token-to-token swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    /// Source tokens sold.
    pub amount_in: u128,
    /// Currency released by the source sell, after its fee.
    pub intermediate_base_currency_amount: u128,
    /// Target tokens the currency buys, after the target buy fee.
    pub expected_output_amount: u128,
}

impl SwapQuote {
    /// True when the swap would deliver nothing.
    ///
    /// This is still a valid quote; slippage checks decide what to do with it.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.expected_output_amount == 0
    }

    /// True when the output satisfies a caller's minimum.
    #[must_use]
    pub const fn meets_minimum(&self, min_amount_out: u128) -> bool {
        self.expected_output_amount >= min_amount_out
    }
}

/// Estimate swapping `amount_in` source base units into the target token.
///
/// # Errors
/// - [`PricingError::InvalidInput`] when `amount_in` is zero.
/// - [`PricingError::InsufficientVirtualSupply`] when `amount_in` exceeds the source supply.
/// - [`PricingError::ArithmeticOverflow`] on overflow.
pub fn quote_swap(
    source: &CurveState,
    target: &CurveState,
    amount_in: u128,
) -> Result<SwapQuote, PricingError> {
    if amount_in == 0 {
        return Err(PricingError::invalid("swap amount must be greater than zero"));
    }
    if amount_in > source.supply {
        return Err(PricingError::InsufficientVirtualSupply {
            requested: amount_in,
            available: source.supply,
        });
    }

    let sol_amount = quote_sell(source, amount_in)?.price_or_proceeds;
    let adjusted_currency = mul_div(
        sol_amount,
        BPS_DENOMINATOR,
        BPS_DENOMINATOR + u128::from(target.buy_fee_bps),
    )?;
    let expected_output_amount = tokens_for_currency(target, adjusted_currency)?;

    Ok(SwapQuote {
        amount_in,
        intermediate_base_currency_amount: sol_amount,
        expected_output_amount,
    })
}
