//! Protocol administration and creator-token deployment.

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::payroll::validate_identifier;
use crate::error::{Error, Result};
use crate::port::ChainClient;
use crate::program::attenomics::{
    DeployAccounts, DistributorConfig, TokenConfig, TokenMetadata, VaultConfig,
};
use crate::program::token::{create_associated_token_account_idempotent, WSOL_MINT};
use crate::program::{Attenomics, EntryPointAccount};

/// Everything needed to launch a creator token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub handle: String,
    pub metadata: TokenMetadata,
    /// Total supply in base units.
    pub total_supply: u128,
    pub self_percent: u8,
    pub market_percent: u8,
    pub supporter_percent: u8,
    /// Registered AI agent the token is bound to.
    pub ai_agent: Pubkey,
    pub distributor: DistributorConfig,
    pub vault: VaultConfig,
}

/// Result of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReceipt {
    pub mint: Pubkey,
    pub accounts: DeployAccounts,
    pub deploy_signature: Signature,
    pub mint_signature: Signature,
}

/// Admin operations on the creator-token program, signed by the service wallet.
#[derive(Clone)]
pub struct ProtocolService {
    chain: Arc<dyn ChainClient>,
    program: Attenomics,
}

impl ProtocolService {
    pub fn new(chain: Arc<dyn ChainClient>, program: Attenomics) -> Self {
        Self { chain, program }
    }

    /// Create the entry point with the service wallet as authority.
    pub async fn initialize(&self, gaslite_drop: &Pubkey, protocol_fee_address: &Pubkey) -> Result<Signature> {
        let authority = self.chain.payer();
        let ix = self
            .program
            .initialize(&authority, gaslite_drop, protocol_fee_address)?;
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(
            entry_point = %self.program.entry_point(),
            protocol_fee = %protocol_fee_address,
            signature = %signature,
            "protocol initialized"
        );
        Ok(signature)
    }

    pub async fn initialize_swap_router(&self) -> Result<Signature> {
        let ix = self.program.initialize_swap_router(&self.chain.payer());
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(swap_router = %self.program.swap_router(), signature = %signature, "swap router initialized");
        Ok(signature)
    }

    /// Allow or revoke an AI agent.
    pub async fn set_ai_agent(&self, agent: &Pubkey, allowed: bool) -> Result<Signature> {
        let ix = self.program.set_ai_agent(&self.chain.payer(), agent, allowed)?;
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(agent = %agent, allowed, signature = %signature, "ai agent updated");
        Ok(signature)
    }

    async fn entry_point(&self) -> Result<EntryPointAccount> {
        let address = self.program.entry_point();
        let data = self
            .chain
            .account_data(&address)
            .await?
            .ok_or_else(|| Error::NotFound(format!("entry point {address}; initialize the protocol first")))?;
        EntryPointAccount::decode(&data)
    }

    /// Deploy a creator token and mint its initial allocations.
    ///
    /// Two transactions: the deployment (co-signed by a fresh mint keypair),
    /// then token-account creation plus `mint_initial_tokens`.
    ///
    /// # Errors
    /// Validation errors for the handle, split and schedule; `NotFound` when
    /// the protocol is not initialized; chain errors from either submission.
    pub async fn deploy_creator_token(&self, request: &DeployRequest) -> Result<DeployReceipt> {
        validate_identifier("handle", &request.handle)?;
        for (field, value) in [
            ("name", &request.metadata.name),
            ("symbol", &request.metadata.symbol),
            ("nftMetadataUri", &request.metadata.uri),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidIdentifier {
                    field,
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }
        if request.total_supply == 0 {
            return Err(DomainError::InvalidAmount {
                amount: "0".to_string(),
                reason: "total supply must be positive",
            }
            .into());
        }

        let config = TokenConfig::new(
            &request.handle,
            request.total_supply,
            (request.self_percent, request.market_percent, request.supporter_percent),
            &request.ai_agent,
        );
        config.validate()?;
        request.distributor.validate_against(&config)?;

        let creator = self.chain.payer();
        let next_token_id = self.entry_point().await?.next_token_id;
        let mint = Keypair::new();
        let mint_key = mint.pubkey();
        let accounts = self.program.deploy_accounts(&mint_key, &config, next_token_id);

        let deploy = self.program.deploy_creator_token(
            &creator,
            &mint_key,
            next_token_id,
            &config,
            &request.distributor,
            &request.vault,
            &request.metadata,
        )?;
        let deploy_signature = self.chain.submit(vec![deploy], &[&mint]).await?;
        info!(
            handle = %request.handle,
            mint = %mint_key,
            token_id = next_token_id,
            signature = %deploy_signature,
            "creator token deployed"
        );

        let instructions = vec![
            create_associated_token_account_idempotent(&creator, &accounts.bonding_curve, &WSOL_MINT),
            create_associated_token_account_idempotent(&creator, &accounts.self_token_vault, &mint_key),
            create_associated_token_account_idempotent(&creator, &accounts.supporter_contract, &mint_key),
            self.program
                .mint_initial_tokens(&creator, &mint_key, &config.handle),
        ];
        let mint_signature = self.chain.submit(instructions, &[]).await?;
        info!(mint = %mint_key, signature = %mint_signature, "initial tokens minted");

        Ok(DeployReceipt {
            mint: mint_key,
            accounts,
            deploy_signature,
            mint_signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::anchor::instruction_discriminator;
    use crate::testkit::chain::MockChain;

    fn request() -> DeployRequest {
        DeployRequest {
            handle: "alice".into(),
            metadata: TokenMetadata {
                name: "Alice".into(),
                symbol: "ALC".into(),
                uri: "https://example.com/alice.json".into(),
            },
            total_supply: 1_000_000_000 * 1_000_000_000,
            self_percent: 10,
            market_percent: 50,
            supporter_percent: 40,
            ai_agent: Pubkey::new_unique(),
            distributor: DistributorConfig::default(),
            vault: VaultConfig::default(),
        }
    }

    fn service() -> (Arc<MockChain>, Attenomics, ProtocolService) {
        let chain = Arc::new(MockChain::new());
        let program = Attenomics::default();
        (chain.clone(), program, ProtocolService::new(chain, program))
    }

    #[tokio::test]
    async fn deploy_uses_next_token_id_and_mint_cosigner() {
        let (chain, program, protocol) = service();
        chain.set_entry_point(&program, 7);

        let receipt = protocol.deploy_creator_token(&request()).await.unwrap();

        assert_eq!(receipt.accounts.nft, program.nft(7));
        assert_eq!(receipt.accounts.bonding_curve, program.bonding_curve(&receipt.mint));
        let submitted = chain.submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].signers, vec![receipt.mint]);
        assert_eq!(
            &submitted[0].instructions[0].data[..8],
            instruction_discriminator("deploy_creator_token")
        );
        let follow_up = &submitted[1].instructions;
        assert_eq!(follow_up.len(), 4);
        assert_eq!(&follow_up[3].data[..8], instruction_discriminator("mint_initial_tokens"));
    }

    #[tokio::test]
    async fn deploy_rejects_bad_split_before_touching_chain() {
        let (chain, program, protocol) = service();
        chain.set_entry_point(&program, 0);
        let mut bad = request();
        bad.market_percent = 51;

        let result = protocol.deploy_creator_token(&bad).await;

        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::InvalidAllocation { total: 101 }))
        ));
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn deploy_rejects_schedule_larger_than_supporter_share() {
        let (chain, program, protocol) = service();
        chain.set_entry_point(&program, 0);
        let mut small = request();
        small.total_supply = 1_000 * 1_000_000_000;

        let result = protocol.deploy_creator_token(&small).await;

        assert!(matches!(
            result,
            Err(Error::Domain(DomainError::DistributionExceedsAllocation { .. }))
        ));
    }

    #[tokio::test]
    async fn deploy_requires_initialized_protocol() {
        let (_, _, protocol) = service();
        let result = protocol.deploy_creator_token(&request()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
