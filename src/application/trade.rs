//! Trade orchestration: guardrails, prerequisite accounts and submission.
//!
//! Each trade fetches curve state, quotes it, checks the caller's limits and
//! balances against that quote, then submits in the same request. A trade is
//! never submitted on a quote computed from older state.

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::{info, warn};

use super::account::missing_token_accounts;
use super::quote::QuoteService;
use crate::domain::curve::{quote_buy, quote_sell, Quote};
use crate::domain::swap::{quote_swap, SwapQuote};
use crate::error::{Result, TradeError};
use crate::port::ChainClient;
use crate::program::token::{associated_token_address, WSOL_MINT};
use crate::program::Attenomics;

/// Buy `amount` base units of `mint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyRequest {
    pub mint: Pubkey,
    pub amount: u64,
    /// Pay with native SOL instead of the wallet's WSOL account.
    pub use_native_sol: bool,
    /// Reject if the quoted total cost exceeds this many lamports.
    pub max_amount_in: Option<u64>,
}

/// Sell `amount` base units of `mint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellRequest {
    pub mint: Pubkey,
    pub amount: u64,
    /// Reject if quoted proceeds fall below this many lamports.
    pub min_amount_out: Option<u64>,
}

/// Swap `amount_in` of `source_mint` into `target_mint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub source_mint: Pubkey,
    pub target_mint: Pubkey,
    pub amount_in: u64,
    /// Minimum target tokens; also enforced on-chain.
    pub min_amount_out: u64,
}

/// A submitted buy or sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReceipt {
    pub signature: Signature,
    pub quote: Quote,
}

/// A submitted swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub signature: Signature,
    pub quote: SwapQuote,
}

/// Validates and submits buys, sells and swaps as the service wallet.
#[derive(Clone)]
pub struct TradeOrchestrator {
    chain: Arc<dyn ChainClient>,
    quotes: QuoteService,
}

impl TradeOrchestrator {
    pub fn new(chain: Arc<dyn ChainClient>, program: Attenomics) -> Self {
        Self {
            quotes: QuoteService::new(chain.clone(), program),
            chain,
        }
    }

    fn program(&self) -> &Attenomics {
        self.quotes.program()
    }

    async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        Ok(self
            .chain
            .token_balance(&associated_token_address(owner, mint))
            .await?
            .unwrap_or(0))
    }

    async fn curve_vault_balance(&self, mint: &Pubkey) -> Result<u64> {
        let vault = self.program().curve_wsol_vault(mint);
        self.chain
            .token_balance(&vault)
            .await?
            .ok_or_else(|| {
                TradeError::AccountMissing {
                    account: format!("bonding curve WSOL vault {vault}"),
                }
                .into()
            })
    }

    /// Buy tokens from a curve.
    ///
    /// # Errors
    /// Pricing errors, [`TradeError::MaxInputExceeded`],
    /// [`TradeError::InsufficientBalance`], or a chain error on submission.
    pub async fn buy(&self, request: &BuyRequest) -> Result<TradeReceipt> {
        let payer = self.chain.payer();
        let state = self.quotes.state(&request.mint).await?;
        let quote = quote_buy(&state, u128::from(request.amount))?;

        if let Some(maximum) = request.max_amount_in {
            if quote.price_or_proceeds > u128::from(maximum) {
                return Err(TradeError::MaxInputExceeded {
                    cost: quote.price_or_proceeds,
                    maximum: u128::from(maximum),
                }
                .into());
            }
        }

        let (asset, available) = if request.use_native_sol {
            ("SOL", self.chain.lamports(&payer).await?)
        } else {
            ("WSOL", self.token_balance(&payer, &WSOL_MINT).await?)
        };
        if u128::from(available) < quote.price_or_proceeds {
            return Err(TradeError::InsufficientBalance {
                asset,
                required: quote.price_or_proceeds,
                available: u128::from(available),
            }
            .into());
        }

        let mut instructions = missing_token_accounts(
            self.chain.as_ref(),
            &payer,
            &[(payer, request.mint), (payer, WSOL_MINT)],
        )
        .await?;
        instructions.push(
            self.program()
                .buy(&payer, &request.mint, request.amount, request.use_native_sol),
        );

        let signature = self.chain.submit(instructions, &[]).await?;
        info!(
            mint = %request.mint,
            amount = request.amount,
            cost = %quote.price_or_proceeds,
            native_sol = request.use_native_sol,
            signature = %signature,
            "buy submitted"
        );
        Ok(TradeReceipt { signature, quote })
    }

    /// Sell tokens back to a curve.
    ///
    /// # Errors
    /// Pricing errors, [`TradeError::SlippageExceeded`],
    /// [`TradeError::InsufficientBalance`], a missing or short curve vault, or
    /// a chain error on submission.
    pub async fn sell(&self, request: &SellRequest) -> Result<TradeReceipt> {
        let payer = self.chain.payer();
        let state = self.quotes.state(&request.mint).await?;
        let quote = quote_sell(&state, u128::from(request.amount))?;

        if let Some(minimum) = request.min_amount_out {
            if quote.price_or_proceeds < u128::from(minimum) {
                return Err(TradeError::SlippageExceeded {
                    expected: quote.price_or_proceeds,
                    minimum: u128::from(minimum),
                }
                .into());
            }
        }

        let held = self.token_balance(&payer, &request.mint).await?;
        if held < request.amount {
            return Err(TradeError::InsufficientBalance {
                asset: "token",
                required: u128::from(request.amount),
                available: u128::from(held),
            }
            .into());
        }

        let vault = self.curve_vault_balance(&request.mint).await?;
        if u128::from(vault) < quote.before_fee() {
            return Err(TradeError::VaultShortfall {
                required: quote.before_fee(),
                available: u128::from(vault),
            }
            .into());
        }

        let mut instructions =
            missing_token_accounts(self.chain.as_ref(), &payer, &[(payer, WSOL_MINT)]).await?;
        instructions.push(self.program().sell(&payer, &request.mint, request.amount));

        let signature = self.chain.submit(instructions, &[]).await?;
        info!(
            mint = %request.mint,
            amount = request.amount,
            proceeds = %quote.price_or_proceeds,
            signature = %signature,
            "sell submitted"
        );
        Ok(TradeReceipt { signature, quote })
    }

    /// Swap one creator token for another through the swap router.
    ///
    /// # Errors
    /// [`TradeError::SameMint`], pricing errors, balance and vault checks,
    /// [`TradeError::ZeroOutput`], [`TradeError::SlippageExceeded`], or a
    /// chain error on submission.
    pub async fn swap(&self, request: &SwapRequest) -> Result<SwapReceipt> {
        if request.source_mint == request.target_mint {
            return Err(TradeError::SameMint.into());
        }
        let payer = self.chain.payer();
        let source = self.quotes.state(&request.source_mint).await?;
        let target = self.quotes.state(&request.target_mint).await?;
        let quote = quote_swap(&source, &target, u128::from(request.amount_in))?;

        let held = self.token_balance(&payer, &request.source_mint).await?;
        if held < request.amount_in {
            return Err(TradeError::InsufficientBalance {
                asset: "source token",
                required: u128::from(request.amount_in),
                available: u128::from(held),
            }
            .into());
        }

        let vault = self.curve_vault_balance(&request.source_mint).await?;
        if u128::from(vault) < quote.intermediate_base_currency_amount {
            return Err(TradeError::VaultShortfall {
                required: quote.intermediate_base_currency_amount,
                available: u128::from(vault),
            }
            .into());
        }

        if quote.is_empty() {
            warn!(
                source = %request.source_mint,
                target = %request.target_mint,
                amount_in = request.amount_in,
                "swap quote has zero output"
            );
            return Err(TradeError::ZeroOutput.into());
        }
        if !quote.meets_minimum(u128::from(request.min_amount_out)) {
            return Err(TradeError::SlippageExceeded {
                expected: quote.expected_output_amount,
                minimum: u128::from(request.min_amount_out),
            }
            .into());
        }

        let mut instructions = missing_token_accounts(
            self.chain.as_ref(),
            &payer,
            &[(payer, request.target_mint)],
        )
        .await?;
        instructions.push(self.program().swap_tokens(
            &payer,
            &request.source_mint,
            &request.target_mint,
            request.amount_in,
            request.min_amount_out,
        ));

        let signature = self.chain.submit(instructions, &[]).await?;
        info!(
            source = %request.source_mint,
            target = %request.target_mint,
            amount_in = request.amount_in,
            expected_out = %quote.expected_output_amount,
            signature = %signature,
            "swap submitted"
        );
        Ok(SwapReceipt { signature, quote })
    }
}
