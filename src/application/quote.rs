//! Quote service: prices against freshly fetched curve state.
//!
//! Every call reads the curve account again; nothing is cached between
//! requests because a stale supply misprices the trade.

use std::sync::Arc;

use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::domain::amount::to_decimal;
use crate::domain::curve::{quote_buy, quote_sell, CurveState, Quote, SCALE};
use crate::domain::swap::{quote_swap, SwapQuote};
use crate::error::{Result, TradeError};
use crate::port::ChainClient;
use crate::program::{Attenomics, BondingCurveAccount};

/// Spot price of one whole token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPrice {
    pub mint: Pubkey,
    /// Cost of one token including the buy fee, in lamports.
    pub price_lamports: u128,
    /// Same price in SOL.
    pub price_sol: Decimal,
    pub supply: u128,
    pub remaining_supply: u128,
    pub buy_fee_bps: u16,
    pub sell_fee_bps: u16,
}

/// Fetches curve state and prices trades against it.
#[derive(Clone)]
pub struct QuoteService {
    chain: Arc<dyn ChainClient>,
    program: Attenomics,
}

impl QuoteService {
    pub fn new(chain: Arc<dyn ChainClient>, program: Attenomics) -> Self {
        Self { chain, program }
    }

    #[must_use]
    pub const fn program(&self) -> &Attenomics {
        &self.program
    }

    /// Fetch and decode the bonding curve of `mint`.
    ///
    /// # Errors
    /// [`TradeError::CurveNotFound`] if the account is missing, or a parse
    /// error if it is not a bonding curve.
    pub async fn curve(&self, mint: &Pubkey) -> Result<BondingCurveAccount> {
        let address = self.program.bonding_curve(mint);
        let data = self
            .chain
            .account_data(&address)
            .await?
            .ok_or_else(|| TradeError::CurveNotFound {
                mint: mint.to_string(),
            })?;
        let curve = BondingCurveAccount::decode(&data)?;
        debug!(
            mint = %mint,
            supply = curve.purchase_market_supply,
            buy_fee = curve.buy_fee_percent,
            sell_fee = curve.sell_fee_percent,
            "fetched bonding curve"
        );
        Ok(curve)
    }

    /// Pricing snapshot of `mint`'s curve.
    pub async fn state(&self, mint: &Pubkey) -> Result<CurveState> {
        Ok(self.curve(mint).await?.state())
    }

    /// Price of one whole token.
    pub async fn token_price(&self, mint: &Pubkey) -> Result<TokenPrice> {
        let state = self.state(mint).await?;
        let quote = quote_buy(&state, SCALE)?;
        Ok(TokenPrice {
            mint: *mint,
            price_lamports: quote.price_or_proceeds,
            price_sol: to_decimal(quote.price_or_proceeds).unwrap_or(Decimal::MAX),
            supply: state.supply,
            remaining_supply: state.remaining_supply(),
            buy_fee_bps: state.buy_fee_bps,
            sell_fee_bps: state.sell_fee_bps,
        })
    }

    /// Quote buying `amount` base units of `mint`.
    pub async fn quote_buy(&self, mint: &Pubkey, amount: u128) -> Result<Quote> {
        let state = self.state(mint).await?;
        Ok(quote_buy(&state, amount)?)
    }

    /// Quote selling `amount` base units of `mint`.
    pub async fn quote_sell(&self, mint: &Pubkey, amount: u128) -> Result<Quote> {
        let state = self.state(mint).await?;
        Ok(quote_sell(&state, amount)?)
    }

    /// Quote swapping `amount_in` base units of `source` into `target`.
    pub async fn quote_swap(&self, source: &Pubkey, target: &Pubkey, amount_in: u128) -> Result<SwapQuote> {
        if source == target {
            return Err(TradeError::SameMint.into());
        }
        let source_state = self.state(source).await?;
        let target_state = self.state(target).await?;
        Ok(quote_swap(&source_state, &target_state, amount_in)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::chain::MockChain;

    fn service(chain: MockChain) -> QuoteService {
        QuoteService::new(Arc::new(chain), Attenomics::default())
    }

    #[tokio::test]
    async fn token_price_of_fresh_curve() {
        let chain = MockChain::new();
        let mint = Pubkey::new_unique();
        chain.set_curve(&Attenomics::default(), &mint, CurveState::new(0, 0, 50, 50));

        let price = service(chain).token_price(&mint).await.unwrap();

        assert_eq!(price.price_lamports, 52);
        assert_eq!(price.supply, 0);
        assert_eq!(price.remaining_supply, crate::domain::curve::VIRTUAL_TOKEN_SUPPLY);
    }

    #[tokio::test]
    async fn missing_curve_is_reported() {
        let result = service(MockChain::new()).token_price(&Pubkey::new_unique()).await;
        assert!(matches!(result, Err(Error::Trade(TradeError::CurveNotFound { .. }))));
    }

    #[tokio::test]
    async fn swap_between_same_mint_is_rejected() {
        let mint = Pubkey::new_unique();
        let result = service(MockChain::new()).quote_swap(&mint, &mint, 1).await;
        assert!(matches!(result, Err(Error::Trade(TradeError::SameMint))));
    }

    #[tokio::test]
    async fn each_quote_reads_current_supply() {
        let chain = Arc::new(MockChain::new());
        let mint = Pubkey::new_unique();
        let program = Attenomics::default();
        chain.set_curve(&program, &mint, CurveState::new(0, 0, 0, 0));
        let quotes = QuoteService::new(chain.clone(), program);

        let before = quotes.quote_buy(&mint, 1_000 * SCALE).await.unwrap();
        chain.set_curve(&program, &mint, CurveState::new(1_000_000 * SCALE, 0, 0, 0));
        let after = quotes.quote_buy(&mint, 1_000 * SCALE).await.unwrap();

        assert!(after.price_or_proceeds > before.price_or_proceeds);
    }
}
