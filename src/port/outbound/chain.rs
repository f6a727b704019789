//! Blockchain ports: account reads and transaction submission.
//!
//! The RPC adapter implements these for a live cluster; the testkit provides
//! an in-memory ledger.

use async_trait::async_trait;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};

use crate::error::Result;
use crate::program::token::token_account_amount;

/// Read access to on-chain accounts.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Raw data of `address`, or `None` if the account does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Lamport balance of `address` (zero for missing accounts).
    async fn lamports(&self, address: &Pubkey) -> Result<u64>;

    /// Accounts owned by `program_id` whose data matches `bytes` at `offset`.
    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        offset: usize,
        bytes: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// Whether `address` exists.
    async fn exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.account_data(address).await?.is_some())
    }

    /// Token balance of an SPL token account, or `None` if it does not exist.
    async fn token_balance(&self, token_account: &Pubkey) -> Result<Option<u64>> {
        Ok(self
            .account_data(token_account)
            .await?
            .as_deref()
            .and_then(token_account_amount))
    }
}

/// Signs and submits transactions as the service wallet.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Service wallet that pays for and signs every transaction.
    fn payer(&self) -> Pubkey;

    /// Submit `instructions` in one transaction and wait for confirmation.
    ///
    /// `extra_signers` co-sign alongside the payer.
    async fn submit(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature>;
}

/// Full chain access.
pub trait ChainClient: ChainReader + ChainWriter {}

impl<T: ChainReader + ChainWriter> ChainClient for T {}
