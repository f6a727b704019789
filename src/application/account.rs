//! Lazy creation of associated token accounts.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::error::Result;
use crate::port::ChainReader;
use crate::program::token::{associated_token_address, create_associated_token_account_idempotent};

/// Instructions creating whichever `(owner, mint)` token accounts are missing.
///
/// The caller prepends them to its own transaction so account creation and
/// the trade land atomically.
pub async fn missing_token_accounts(
    chain: &dyn ChainReader,
    payer: &Pubkey,
    accounts: &[(Pubkey, Pubkey)],
) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();
    for (owner, mint) in accounts {
        let address = associated_token_address(owner, mint);
        if !chain.exists(&address).await? {
            debug!(owner = %owner, mint = %mint, account = %address, "creating token account");
            instructions.push(create_associated_token_account_idempotent(payer, owner, mint));
        }
    }
    Ok(instructions)
}
