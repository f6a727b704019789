//! Bonding-curve pricing.
//!
//! A creator token is priced by a virtual-reserve curve: the effective
//! base-currency reserve grows with supply, and buying pushes the reserve up
//! hyperbolically as supply approaches [`VIRTUAL_TOKEN_SUPPLY`].
//!
//! All functions are pure. Intermediates are checked 256-bit integers; results
//! are base units (lamports for the currency side, 10^-9 token for the token
//! side).
//!
//! Rounding: the buy reserve step and the buy fee round up, so every positive
//! purchase costs at least one lamport and any non-zero fee charges at least
//! one lamport. All other divisions round down.

use serde::{Deserialize, Serialize};

use super::error::PricingError;
use super::math::{add, div, mul, mul_div, mul_div_ceil, narrow, wide};

/// Notional currency reserve at zero supply, in lamports (0.5 SOL).
pub const VIRTUAL_RESERVE_BASE: u128 = 500_000_000;

/// Notional maximum sellable supply, in token base units.
pub const VIRTUAL_TOKEN_SUPPLY: u128 = 10_000_000_000_000_000;

/// Token base-unit divisor (9 decimals).
pub const SCALE: u128 = 1_000_000_000;

/// Basis-point denominator for fees.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Extra precision the sell trapezoid carries marginal prices at.
const PRICE_PRECISION: u128 = 1_000_000_000;

/// Snapshot of one curve, as read from its on-chain account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveState {
    /// Base units already sold from this curve.
    pub supply: u128,
    /// Price-scaling constant.
    pub initial_price: u64,
    /// Buy fee in basis points.
    pub buy_fee_bps: u16,
    /// Sell fee in basis points.
    pub sell_fee_bps: u16,
}

impl CurveState {
    #[must_use]
    pub const fn new(supply: u128, initial_price: u64, buy_fee_bps: u16, sell_fee_bps: u16) -> Self {
        Self {
            supply,
            initial_price,
            buy_fee_bps,
            sell_fee_bps,
        }
    }

    /// Base units still purchasable before the virtual ceiling.
    #[must_use]
    pub const fn remaining_supply(&self) -> u128 {
        VIRTUAL_TOKEN_SUPPLY.saturating_sub(self.supply)
    }
}

/// Which way a [`Quote`] trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Result of pricing a buy or a sell.
///
/// For a buy, `price_or_proceeds` is the total cost including fee. For a sell
/// it is the net proceeds after fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub side: TradeSide,
    pub amount_base_units: u128,
    pub price_or_proceeds: u128,
    pub fee_base_units: u128,
}

impl Quote {
    /// Currency amount before the fee was applied.
    #[must_use]
    pub const fn before_fee(&self) -> u128 {
        match self.side {
            TradeSide::Buy => self.price_or_proceeds - self.fee_base_units,
            TradeSide::Sell => self.price_or_proceeds + self.fee_base_units,
        }
    }
}

/// Effective currency reserve at `supply`.
///
/// # Errors
/// Returns [`PricingError::ArithmeticOverflow`] if the reserve leaves `u128`.
pub fn reserve(supply: u128, initial_price: u64) -> Result<u128, PricingError> {
    let growth = mul_div(supply, u128::from(initial_price), SCALE)?;
    VIRTUAL_RESERVE_BASE
        .checked_add(growth)
        .ok_or(PricingError::ArithmeticOverflow)
}

fn distance_to_ceiling(supply: u128) -> u128 {
    VIRTUAL_TOKEN_SUPPLY.saturating_sub(supply).max(1)
}

// reserve(s) * V / d(s) is the reserve multiple Buy moves along; scaling it by
// SCALE / d(s) gives the derivative of Buy's reserve step per whole token.
fn marginal_price_scaled(supply: u128, initial_price: u64) -> Result<primitive_types::U256, PricingError> {
    let distance = wide(distance_to_ceiling(supply));
    let numerator = mul(
        mul(
            mul(wide(reserve(supply, initial_price)?), wide(VIRTUAL_TOKEN_SUPPLY))?,
            wide(SCALE),
        )?,
        wide(PRICE_PRECISION),
    )?;
    div(numerator, mul(distance, distance)?)
}

/// Marginal price of one whole token at `supply`, in lamports.
///
/// # Errors
/// Returns [`PricingError::ArithmeticOverflow`] on overflow.
pub fn price_at(supply: u128, initial_price: u64) -> Result<u128, PricingError> {
    narrow(div(
        marginal_price_scaled(supply, initial_price)?,
        wide(PRICE_PRECISION),
    )?)
}

/// Cost of moving supply from `supply` to `supply + amount`.
///
/// # Errors
/// - [`PricingError::InvalidInput`] when `amount` is zero.
/// - [`PricingError::InsufficientVirtualSupply`] when the purchase crosses the ceiling.
/// - [`PricingError::ArithmeticOverflow`] on overflow.
pub fn buy(
    supply: u128,
    amount: u128,
    buy_fee_bps: u16,
    initial_price: u64,
) -> Result<Quote, PricingError> {
    if amount == 0 {
        return Err(PricingError::invalid("buy amount must be greater than zero"));
    }
    let end = supply
        .checked_add(amount)
        .ok_or(PricingError::ArithmeticOverflow)?;
    if end > VIRTUAL_TOKEN_SUPPLY {
        return Err(PricingError::InsufficientVirtualSupply {
            requested: amount,
            available: VIRTUAL_TOKEN_SUPPLY.saturating_sub(supply),
        });
    }

    let current_reserve = reserve(supply, initial_price)?;
    let new_reserve = mul_div_ceil(current_reserve, VIRTUAL_TOKEN_SUPPLY, distance_to_ceiling(end))?;
    let raw_cost = new_reserve
        .checked_sub(current_reserve)
        .ok_or(PricingError::ArithmeticOverflow)?;
    let fee = mul_div_ceil(raw_cost, u128::from(buy_fee_bps), BPS_DENOMINATOR)?;
    let total = raw_cost
        .checked_add(fee)
        .ok_or(PricingError::ArithmeticOverflow)?;

    Ok(Quote {
        side: TradeSide::Buy,
        amount_base_units: amount,
        price_or_proceeds: total,
        fee_base_units: fee,
    })
}

/// Proceeds of moving supply from `supply` down to `supply - amount`.
///
/// Uses the trapezoid of the two endpoint marginal prices. Proceeds floor at
/// zero when the fee is 100% or more.
///
/// From an empty curve, selling back what was bought returns the buy cost
/// within 1% (for 1,000 tokens up to 1% of the ceiling, while reserve growth
/// stays small). Once supply is positive [`buy`] charges the full reserve
/// multiple from the current supply, so the two drift far apart.
///
/// # Errors
/// - [`PricingError::InvalidInput`] when `amount` is zero or exceeds `supply`.
/// - [`PricingError::ArithmeticOverflow`] on overflow.
pub fn sell(
    supply: u128,
    amount: u128,
    sell_fee_bps: u16,
    initial_price: u64,
) -> Result<Quote, PricingError> {
    if amount == 0 {
        return Err(PricingError::invalid("sell amount must be greater than zero"));
    }
    if amount > supply {
        return Err(PricingError::invalid(format!(
            "cannot sell {amount} base units, curve supply is {supply}"
        )));
    }

    let upper = marginal_price_scaled(supply, initial_price)?;
    let lower = marginal_price_scaled(supply - amount, initial_price)?;
    let raw_proceeds = narrow(div(
        mul(add(upper, lower)?, wide(amount))?,
        mul(wide(2 * SCALE), wide(PRICE_PRECISION))?,
    )?)?;
    let fee = mul_div(raw_proceeds, u128::from(sell_fee_bps), BPS_DENOMINATOR)?;
    let proceeds = raw_proceeds.saturating_sub(fee);

    Ok(Quote {
        side: TradeSide::Sell,
        amount_base_units: amount,
        price_or_proceeds: proceeds,
        fee_base_units: raw_proceeds - proceeds,
    })
}

/// Price a buy of `amount` base units against `state`.
///
/// # Errors
/// See [`buy`].
pub fn quote_buy(state: &CurveState, amount: u128) -> Result<Quote, PricingError> {
    buy(state.supply, amount, state.buy_fee_bps, state.initial_price)
}

/// Price a sell of `amount` base units against `state`.
///
/// # Errors
/// See [`sell`].
pub fn quote_sell(state: &CurveState, amount: u128) -> Result<Quote, PricingError> {
    sell(state.supply, amount, state.sell_fee_bps, state.initial_price)
}

/// Tokens that `currency` lamports buy on `state`, fee already removed.
///
/// Solves the reserve/token product for the token side: the curve's remaining
/// tokens shrink in proportion to the reserve growing. The retained token side
/// rounds up so the result never overstates the output.
///
/// # Errors
/// - [`PricingError::InvalidInput`] when the curve is past its ceiling.
/// - [`PricingError::ArithmeticOverflow`] on overflow.
pub fn tokens_for_currency(state: &CurveState, currency: u128) -> Result<u128, PricingError> {
    let current_tokens = VIRTUAL_TOKEN_SUPPLY
        .checked_sub(state.supply)
        .ok_or_else(|| PricingError::invalid("curve supply exceeds the virtual ceiling"))?;
    let current_reserve = reserve(state.supply, state.initial_price)?;
    let new_reserve = current_reserve
        .checked_add(currency)
        .ok_or(PricingError::ArithmeticOverflow)?;
    let new_tokens = mul_div_ceil(current_tokens, current_reserve, new_reserve)?;
    Ok(current_tokens.saturating_sub(new_tokens))
}
