//! In-memory ledger implementing the chain ports.
//!
//! Accounts are plain byte blobs keyed by address. Submissions are recorded
//! rather than executed, so tests assert on the instructions a service built.

use std::collections::HashMap;

use async_trait::async_trait;
use borsh::BorshSerialize;
use parking_lot::Mutex;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};

use crate::domain::curve::CurveState;
use crate::error::{Error, Result};
use crate::port::{ChainReader, ChainWriter};
use crate::program::anchor::account_discriminator;
use crate::program::attenomics::{Attenomics, BondingCurveAccount, EntryPointAccount};
use crate::program::payroll::{EmployeeAccount, PayrollAccount, PayrollProgram};
use crate::program::token::TOKEN_PROGRAM_ID;

/// Size of an SPL token account.
const TOKEN_ACCOUNT_LEN: usize = 165;

/// One recorded transaction.
#[derive(Debug, Clone)]
pub struct Submission {
    pub instructions: Vec<Instruction>,
    /// Co-signers besides the payer.
    pub signers: Vec<Pubkey>,
    pub signature: Signature,
}

#[derive(Default)]
struct Ledger {
    accounts: HashMap<Pubkey, (Pubkey, Vec<u8>)>,
    lamports: HashMap<Pubkey, u64>,
    submitted: Vec<Submission>,
    failure: Option<String>,
}

/// Scriptable chain double.
pub struct MockChain {
    payer: Pubkey,
    ledger: Mutex<Ledger>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            payer: Pubkey::new_unique(),
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Service wallet address.
    pub fn payer_key(&self) -> Pubkey {
        self.payer
    }

    /// Store raw data at `address`, owned by the system program.
    pub fn set_account(&self, address: &Pubkey, data: Vec<u8>) {
        self.set_program_account(&solana_sdk::system_program::ID, address, data);
    }

    /// Store raw data at `address`, owned by `program_id`.
    pub fn set_program_account(&self, program_id: &Pubkey, address: &Pubkey, data: Vec<u8>) {
        self.ledger.lock().accounts.insert(*address, (*program_id, data));
    }

    pub fn remove_account(&self, address: &Pubkey) {
        self.ledger.lock().accounts.remove(address);
    }

    pub fn set_lamports(&self, address: &Pubkey, lamports: u64) {
        self.ledger.lock().lamports.insert(*address, lamports);
    }

    /// Create or overwrite an SPL token account holding `amount`.
    pub fn set_token_balance(&self, token_account: &Pubkey, amount: u64) {
        let mut data = vec![0u8; TOKEN_ACCOUNT_LEN];
        data[64..72].copy_from_slice(&amount.to_le_bytes());
        self.set_program_account(&TOKEN_PROGRAM_ID, token_account, data);
    }

    fn set_anchor_account<T: BorshSerialize>(&self, program_id: &Pubkey, address: &Pubkey, name: &str, value: &T) {
        let mut data = account_discriminator(name).to_vec();
        data.extend(borsh::to_vec(value).expect("borsh encoding of test account"));
        self.set_program_account(program_id, address, data);
    }

    /// Install a bonding curve for `mint` reflecting `state`.
    pub fn set_curve(&self, program: &Attenomics, mint: &Pubkey, state: CurveState) {
        let account = BondingCurveAccount {
            token_mint: mint.to_bytes(),
            protocol_fee_address: Pubkey::new_unique().to_bytes(),
            buy_fee_percent: state.buy_fee_bps,
            sell_fee_percent: state.sell_fee_bps,
            purchase_market_supply: u64::try_from(state.supply).expect("test supply fits u64"),
            lifetime_protocol_fees: 0,
            reserve_ratio: 500_000,
            initial_price: state.initial_price,
        };
        self.set_anchor_account(
            &program.program_id,
            &program.bonding_curve(mint),
            BondingCurveAccount::NAME,
            &account,
        );
    }

    /// Install the creator-token entry point.
    pub fn set_entry_point(&self, program: &Attenomics, next_token_id: u64) {
        let account = EntryPointAccount {
            authority: self.payer.to_bytes(),
            gaslite_drop_address: Pubkey::new_unique().to_bytes(),
            protocol_fee_address: Pubkey::new_unique().to_bytes(),
            next_token_id,
        };
        self.set_anchor_account(
            &program.program_id,
            &program.entry_point(),
            EntryPointAccount::NAME,
            &account,
        );
    }

    /// Install a payroll account under `program`.
    pub fn set_payroll(&self, program: &PayrollProgram, account: &PayrollAccount) {
        self.set_anchor_account(
            &program.program_id,
            &program.payroll(&account.payroll_id),
            PayrollAccount::NAME,
            account,
        );
    }

    /// Install an employee account under `program`.
    pub fn set_employee(&self, program: &PayrollProgram, account: &EmployeeAccount) {
        let data = account.encode().expect("encoding test employee");
        self.set_program_account(
            &program.program_id,
            &program.employee(&account.payroll, &account.employee_id),
            data,
        );
    }

    /// Every transaction submitted so far, oldest first.
    pub fn submitted(&self) -> Vec<Submission> {
        self.ledger.lock().submitted.clone()
    }

    /// Make every later submission fail with `message`.
    pub fn fail_submissions(&self, message: &str) {
        self.ledger.lock().failure = Some(message.to_string());
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.ledger.lock().accounts.get(address).map(|(_, data)| data.clone()))
    }

    async fn lamports(&self, address: &Pubkey) -> Result<u64> {
        Ok(self.ledger.lock().lamports.get(address).copied().unwrap_or(0))
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
        offset: usize,
        bytes: &[u8],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let ledger = self.ledger.lock();
        let mut found: Vec<(Pubkey, Vec<u8>)> = ledger
            .accounts
            .iter()
            .filter(|(_, (owner, data))| {
                owner == program_id && data.get(offset..offset + bytes.len()) == Some(bytes)
            })
            .map(|(address, (_, data))| (*address, data.clone()))
            .collect();
        found.sort_by_key(|(address, _)| *address);
        Ok(found)
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    fn payer(&self) -> Pubkey {
        self.payer
    }

    async fn submit(&self, instructions: Vec<Instruction>, extra_signers: &[&Keypair]) -> Result<Signature> {
        let mut ledger = self.ledger.lock();
        if let Some(message) = &ledger.failure {
            return Err(Error::Chain(message.clone()));
        }
        let signature = Signature::new_unique();
        ledger.submitted.push(Submission {
            instructions,
            signers: extra_signers.iter().map(|k| k.pubkey()).collect(),
            signature,
        });
        Ok(signature)
    }
}
