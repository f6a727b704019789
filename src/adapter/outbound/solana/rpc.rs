//! Chain ports over a Solana JSON-RPC endpoint.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::port::{ChainReader, ChainWriter};

/// Parse a commitment level name (`processed`, `confirmed`, `finalized`).
///
/// # Errors
/// [`ConfigError::InvalidValue`] for any other name.
pub fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    CommitmentConfig::from_str(level).map_err(|e| {
        ConfigError::InvalidValue {
            field: "commitment",
            reason: e.to_string(),
        }
        .into()
    })
}

/// Load the service wallet from a Solana CLI keypair file.
///
/// # Errors
/// [`ConfigError::InvalidValue`] if the file is missing or malformed.
pub fn load_keypair(path: impl AsRef<Path>) -> Result<Keypair> {
    let path = path.as_ref();
    read_keypair_file(path).map_err(|e| {
        ConfigError::InvalidValue {
            field: "keypair_path",
            reason: format!("{}: {e}", path.display()),
        }
        .into()
    })
}

/// RPC-backed [`ChainReader`] and [`ChainWriter`] signing as one wallet.
pub struct SolanaRpc {
    rpc: RpcClient,
    payer: Keypair,
    commitment: CommitmentConfig,
}

impl SolanaRpc {
    pub fn new(rpc_url: impl Into<String>, commitment: CommitmentConfig, payer: Keypair) -> Self {
        let rpc_url = rpc_url.into();
        info!(rpc_url = %rpc_url, payer = %payer.pubkey(), "solana rpc client created");
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url, commitment),
            payer,
            commitment,
        }
    }

    #[must_use]
    pub fn url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl ChainReader for SolanaRpc {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await?
            .value;
        Ok(account.map(|a| a.data))
    }

    async fn lamports(&self, address: &Pubkey) -> Result<u64> {
        Ok(self
            .rpc
            .get_balance_with_commitment(address, self.commitment)
            .await?
            .value)
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        offset: usize,
        bytes: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::Memcmp(Memcmp::new_raw_bytes(
                offset,
                bytes.to_vec(),
            ))]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                commitment: Some(self.commitment),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = self
            .rpc
            .get_program_accounts_with_config(program_id, config)
            .await?;
        debug!(program = %program_id, count = accounts.len(), "fetched program accounts");
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }
}

#[async_trait]
impl ChainWriter for SolanaRpc {
    fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn submit(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = self.rpc.get_latest_blockhash().await?;
        // Signer trait objects are not Send; keep them out of the await points.
        let transaction = {
            let mut signers: Vec<&dyn Signer> = Vec::with_capacity(extra_signers.len() + 1);
            signers.push(&self.payer);
            signers.extend(extra_signers.iter().map(|k| *k as &dyn Signer));
            Transaction::new_signed_with_payer(
                &instructions,
                Some(&self.payer.pubkey()),
                &signers,
                blockhash,
            )
        };
        let signature = self.rpc.send_and_confirm_transaction(&transaction).await?;
        debug!(
            signature = %signature,
            instructions = instructions.len(),
            signers = extra_signers.len() + 1,
            "transaction confirmed"
        );
        Ok(signature)
    }
}
