//! Attenomics creator-token program: addresses, accounts and instructions.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};

use super::anchor::{decode_account, encode, instruction_data};
use super::token::{
    associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID, WSOL_MINT,
};
use crate::domain::curve::CurveState;
use crate::domain::error::DomainError;
use crate::error::Result;

/// Default deployment of the creator-token program.
pub const PROGRAM_ID: Pubkey = pubkey!("BwzroF85PpoMMjmvYBgvdtXRggJUNUs6sfw6LydFjTEj");

/// Derives every program address from a configurable program id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attenomics {
    pub program_id: Pubkey,
}

impl Default for Attenomics {
    fn default() -> Self {
        Self::new(PROGRAM_ID)
    }
}

/// On-chain `BondingCurve` account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BondingCurveAccount {
    pub token_mint: [u8; 32],
    pub protocol_fee_address: [u8; 32],
    pub buy_fee_percent: u16,
    pub sell_fee_percent: u16,
    pub purchase_market_supply: u64,
    pub lifetime_protocol_fees: u64,
    pub reserve_ratio: u64,
    pub initial_price: u64,
}

impl BondingCurveAccount {
    pub const NAME: &'static str = "BondingCurve";

    /// Decode from raw account data.
    ///
    /// # Errors
    /// Fails on a wrong discriminator or truncated data.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_account(Self::NAME, data)
    }

    /// Pricing snapshot of this curve.
    #[must_use]
    pub fn state(&self) -> CurveState {
        CurveState::new(
            u128::from(self.purchase_market_supply),
            self.initial_price,
            self.buy_fee_percent,
            self.sell_fee_percent,
        )
    }

    #[must_use]
    pub fn token_mint(&self) -> Pubkey {
        Pubkey::new_from_array(self.token_mint)
    }
}

/// On-chain `AttenomicsEntryPoint` account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct EntryPointAccount {
    pub authority: [u8; 32],
    pub gaslite_drop_address: [u8; 32],
    pub protocol_fee_address: [u8; 32],
    pub next_token_id: u64,
}

impl EntryPointAccount {
    pub const NAME: &'static str = "AttenomicsEntryPoint";

    /// Decode from raw account data.
    ///
    /// # Errors
    /// Fails on a wrong discriminator or truncated data.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_account(Self::NAME, data)
    }
}

/// Token supply split passed to `deploy_creator_token`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TokenConfig {
    /// Total supply in base units.
    pub total_supply: u128,
    pub self_percent: u8,
    pub market_percent: u8,
    pub supporter_percent: u8,
    /// SHA-256 of the creator handle.
    pub handle: [u8; 32],
    pub ai_agent: [u8; 32],
}

impl TokenConfig {
    /// Build a config for `handle`, hashing it.
    #[must_use]
    pub fn new(
        handle: &str,
        total_supply: u128,
        split: (u8, u8, u8),
        ai_agent: &Pubkey,
    ) -> Self {
        Self {
            total_supply,
            self_percent: split.0,
            market_percent: split.1,
            supporter_percent: split.2,
            handle: hash_handle(handle),
            ai_agent: ai_agent.to_bytes(),
        }
    }

    /// Tokens reserved for supporters.
    #[must_use]
    pub fn supporter_allocation(&self) -> u128 {
        self.total_supply / 100 * u128::from(self.supporter_percent)
            + self.total_supply % 100 * u128::from(self.supporter_percent) / 100
    }

    /// Check the split sums to 100.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidAllocation`] otherwise.
    pub fn validate(&self) -> std::result::Result<(), DomainError> {
        let total = u32::from(self.self_percent)
            + u32::from(self.market_percent)
            + u32::from(self.supporter_percent);
        if total != 100 {
            return Err(DomainError::InvalidAllocation { total });
        }
        Ok(())
    }
}

/// Self-token vault schedule, passed as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VaultConfig {
    pub drip_percentage: u8,
    pub drip_interval: i64,
    pub lock_time: i64,
    pub locked_percentage: u8,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            drip_percentage: 10,
            drip_interval: 86_400,
            lock_time: 31_536_000,
            locked_percentage: 80,
        }
    }
}

/// Supporter distributor schedule, passed as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DistributorConfig {
    pub daily_drip_amount: u64,
    pub drip_interval: i64,
    pub total_days: u16,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            daily_drip_amount: 500 * 1_000_000_000,
            drip_interval: 86_400,
            total_days: 365,
        }
    }
}

impl DistributorConfig {
    /// Tokens dripped over the whole schedule.
    #[must_use]
    pub fn total_distribution(&self) -> u128 {
        u128::from(self.daily_drip_amount) * u128::from(self.total_days)
    }

    /// Check the schedule fits the supporter allocation of `token`.
    ///
    /// # Errors
    /// Returns [`DomainError::DistributionExceedsAllocation`] when it does not.
    pub fn validate_against(&self, token: &TokenConfig) -> std::result::Result<(), DomainError> {
        let required = self.total_distribution();
        let allocation = token.supporter_allocation();
        if required > allocation {
            return Err(DomainError::DistributionExceedsAllocation {
                required,
                allocation,
            });
        }
        Ok(())
    }
}

#[derive(BorshSerialize)]
struct DeployArgs<'a> {
    config: &'a TokenConfig,
    distributor_config_bytes: Vec<u8>,
    vault_config_bytes: Vec<u8>,
    name: &'a str,
    symbol: &'a str,
    nft_metadata_uri: &'a str,
}

/// Metadata strings for a new creator token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// Addresses a deployment creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployAccounts {
    pub creator_token: Pubkey,
    pub nft: Pubkey,
    pub self_token_vault: Pubkey,
    pub bonding_curve: Pubkey,
    pub supporter_contract: Pubkey,
}

/// SHA-256 of a creator handle.
#[must_use]
pub fn hash_handle(handle: &str) -> [u8; 32] {
    Sha256::digest(handle.as_bytes()).into()
}

impl Attenomics {
    #[must_use]
    pub const fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    fn pda(&self, seeds: &[&[u8]]) -> Pubkey {
        Pubkey::find_program_address(seeds, &self.program_id).0
    }

    #[must_use]
    pub fn entry_point(&self) -> Pubkey {
        self.pda(&[b"entry-point"])
    }

    #[must_use]
    pub fn swap_router(&self) -> Pubkey {
        self.pda(&[b"swap-router"])
    }

    #[must_use]
    pub fn bonding_curve(&self, mint: &Pubkey) -> Pubkey {
        self.pda(&[b"bonding-curve", mint.as_ref()])
    }

    #[must_use]
    pub fn creator_token(&self, handle_hash: &[u8; 32]) -> Pubkey {
        self.pda(&[b"creator-token", handle_hash])
    }

    #[must_use]
    pub fn self_token_vault(&self, mint: &Pubkey) -> Pubkey {
        self.pda(&[b"self-token-vault", mint.as_ref()])
    }

    #[must_use]
    pub fn supporter_contract(&self, mint: &Pubkey) -> Pubkey {
        self.pda(&[b"supporter-contract", mint.as_ref()])
    }

    #[must_use]
    pub fn ai_agent(&self, agent: &Pubkey) -> Pubkey {
        self.pda(&[b"ai-agent", agent.as_ref()])
    }

    #[must_use]
    pub fn nft(&self, token_id: u64) -> Pubkey {
        self.pda(&[b"nft", &token_id.to_le_bytes()])
    }

    /// WSOL vault holding a curve's currency reserve.
    #[must_use]
    pub fn curve_wsol_vault(&self, mint: &Pubkey) -> Pubkey {
        associated_token_address(&self.bonding_curve(mint), &WSOL_MINT)
    }

    /// Addresses derived for deploying `mint` under `config`.
    #[must_use]
    pub fn deploy_accounts(&self, mint: &Pubkey, config: &TokenConfig, next_token_id: u64) -> DeployAccounts {
        DeployAccounts {
            creator_token: self.creator_token(&config.handle),
            nft: self.nft(next_token_id),
            self_token_vault: self.self_token_vault(mint),
            bonding_curve: self.bonding_curve(mint),
            supporter_contract: self.supporter_contract(mint),
        }
    }

    /// `initialize(protocol_fee_address)`.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn initialize(
        &self,
        authority: &Pubkey,
        gaslite_drop: &Pubkey,
        protocol_fee_address: &Pubkey,
    ) -> Result<Instruction> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.entry_point(), false),
                AccountMeta::new_readonly(*gaslite_drop, false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("initialize", &encode(&protocol_fee_address.to_bytes())?),
        })
    }

    /// `initialize_swap_router()`.
    #[must_use]
    pub fn initialize_swap_router(&self, authority: &Pubkey) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.swap_router(), false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("initialize_swap_router", &[]),
        }
    }

    /// `set_ai_agent(agent, allowed)`.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn set_ai_agent(&self, authority: &Pubkey, agent: &Pubkey, allowed: bool) -> Result<Instruction> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.entry_point(), false),
                AccountMeta::new(self.ai_agent(agent), false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(*agent, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("set_ai_agent", &encode(&(agent.to_bytes(), allowed))?),
        })
    }

    /// `deploy_creator_token(config, distributor, vault, name, symbol, uri)`.
    ///
    /// The mint keypair must co-sign.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn deploy_creator_token(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        next_token_id: u64,
        config: &TokenConfig,
        distributor: &DistributorConfig,
        vault: &VaultConfig,
        metadata: &TokenMetadata,
    ) -> Result<Instruction> {
        let accounts = self.deploy_accounts(mint, config, next_token_id);
        let ai_agent = Pubkey::new_from_array(config.ai_agent);
        let args = DeployArgs {
            config,
            distributor_config_bytes: encode(distributor)?,
            vault_config_bytes: encode(vault)?,
            name: &metadata.name,
            symbol: &metadata.symbol,
            nft_metadata_uri: &metadata.uri,
        };
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.entry_point(), false),
                AccountMeta::new(accounts.creator_token, false),
                AccountMeta::new(accounts.nft, false),
                AccountMeta::new_readonly(self.ai_agent(&ai_agent), false),
                AccountMeta::new(accounts.self_token_vault, false),
                AccountMeta::new(accounts.bonding_curve, false),
                AccountMeta::new(accounts.supporter_contract, false),
                AccountMeta::new(*mint, true),
                AccountMeta::new(*creator, true),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new_readonly(sysvar::rent::ID, false),
            ],
            data: instruction_data("deploy_creator_token", &encode(&args)?),
        })
    }

    /// `mint_initial_tokens()` for a freshly deployed `mint`.
    #[must_use]
    pub fn mint_initial_tokens(&self, creator: &Pubkey, mint: &Pubkey, handle_hash: &[u8; 32]) -> Instruction {
        let vault = self.self_token_vault(mint);
        let supporter = self.supporter_contract(mint);
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(self.creator_token(handle_hash), false),
                AccountMeta::new_readonly(self.bonding_curve(mint), false),
                AccountMeta::new(*mint, false),
                AccountMeta::new(associated_token_address(&vault, mint), false),
                AccountMeta::new(associated_token_address(&supporter, mint), false),
                AccountMeta::new_readonly(vault, false),
                AccountMeta::new_readonly(supporter, false),
                AccountMeta::new(*creator, true),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("mint_initial_tokens", &[]),
        }
    }

    /// `buy(amount)`.
    ///
    /// With `use_native_sol` the buyer also signs as the native-SOL source;
    /// otherwise the system program stands in.
    #[must_use]
    pub fn buy(&self, buyer: &Pubkey, mint: &Pubkey, amount: u64, use_native_sol: bool) -> Instruction {
        let native = if use_native_sol {
            AccountMeta::new(*buyer, true)
        } else {
            AccountMeta::new_readonly(system_program::ID, false)
        };
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.bonding_curve(mint), false),
                AccountMeta::new(*mint, false),
                AccountMeta::new(*buyer, true),
                AccountMeta::new(associated_token_address(buyer, mint), false),
                AccountMeta::new_readonly(WSOL_MINT, false),
                AccountMeta::new(associated_token_address(buyer, &WSOL_MINT), false),
                AccountMeta::new(self.curve_wsol_vault(mint), false),
                native,
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new_readonly(sysvar::rent::ID, false),
            ],
            data: instruction_data("buy", &amount.to_le_bytes()),
        }
    }

    /// `sell(amount)`.
    #[must_use]
    pub fn sell(&self, seller: &Pubkey, mint: &Pubkey, amount: u64) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.bonding_curve(mint), false),
                AccountMeta::new(*mint, false),
                AccountMeta::new(*seller, true),
                AccountMeta::new(associated_token_address(seller, mint), false),
                AccountMeta::new_readonly(WSOL_MINT, false),
                AccountMeta::new(associated_token_address(seller, &WSOL_MINT), false),
                AccountMeta::new(self.curve_wsol_vault(mint), false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("sell", &amount.to_le_bytes()),
        }
    }

    /// `swap_tokens(amount_in, min_amount_out)`.
    #[must_use]
    pub fn swap_tokens(
        &self,
        user: &Pubkey,
        source_mint: &Pubkey,
        target_mint: &Pubkey,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Instruction {
        let mut args = Vec::with_capacity(16);
        args.extend_from_slice(&amount_in.to_le_bytes());
        args.extend_from_slice(&min_amount_out.to_le_bytes());
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(self.swap_router(), false),
                AccountMeta::new(self.bonding_curve(source_mint), false),
                AccountMeta::new(*source_mint, false),
                AccountMeta::new(self.bonding_curve(target_mint), false),
                AccountMeta::new(*target_mint, false),
                AccountMeta::new(*user, true),
                AccountMeta::new(associated_token_address(user, source_mint), false),
                AccountMeta::new(associated_token_address(user, target_mint), false),
                AccountMeta::new(self.curve_wsol_vault(source_mint), false),
                AccountMeta::new(self.curve_wsol_vault(target_mint), false),
                AccountMeta::new_readonly(WSOL_MINT, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("swap_tokens", &args),
        }
    }
}
