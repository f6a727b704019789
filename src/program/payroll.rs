//! Payroll program: addresses, accounts and instructions.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};

use super::anchor::{decode_account, encode, instruction_data, DISCRIMINATOR_LEN};
use super::token::TOKEN_PROGRAM_ID;
use crate::domain::payroll::PaymentFrequency;
use crate::error::{Error, Result};

/// Default deployment of the payroll program.
pub const PROGRAM_ID: Pubkey = pubkey!("3CkB1YhoBxHG9uZXJ3fDkjshjb9nXdFQkLSKKNYz9vX7");

/// Byte offset of `Employee::payroll`, used to list a payroll's employees.
pub const EMPLOYEE_PAYROLL_OFFSET: usize = DISCRIMINATOR_LEN;

/// On-chain `Payroll` account.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PayrollAccount {
    pub authority: [u8; 32],
    pub payroll_id: String,
    pub payment_token: [u8; 32],
    pub employee_count: u64,
    pub is_active: bool,
    pub tax_rate: u16,
    pub total_funds: u64,
}

impl PayrollAccount {
    pub const NAME: &'static str = "Payroll";

    /// Decode from raw account data.
    ///
    /// # Errors
    /// Fails on a wrong discriminator or truncated data.
    pub fn decode(data: &[u8]) -> Result<Self> {
        decode_account(Self::NAME, data)
    }

    #[must_use]
    pub fn authority(&self) -> Pubkey {
        Pubkey::new_from_array(self.authority)
    }

    #[must_use]
    pub fn payment_token(&self) -> Pubkey {
        Pubkey::new_from_array(self.payment_token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
struct RawEmployee {
    payroll: [u8; 32],
    employee_id: String,
    wallet: [u8; 32],
    salary_amount: u64,
    deductions: u64,
    payment_frequency: u8,
    last_payment: i64,
    is_active: bool,
}

/// On-chain `Employee` account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAccount {
    pub payroll: Pubkey,
    pub employee_id: String,
    /// Token account salaries are paid into.
    pub wallet: Pubkey,
    pub salary_amount: u64,
    pub deductions: u64,
    pub payment_frequency: PaymentFrequency,
    pub last_payment: i64,
    pub is_active: bool,
}

impl EmployeeAccount {
    pub const NAME: &'static str = "Employee";

    /// Decode from raw account data.
    ///
    /// # Errors
    /// Fails on a wrong discriminator, truncated data or an unknown frequency tag.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let raw: RawEmployee = decode_account(Self::NAME, data)?;
        let payment_frequency = PaymentFrequency::from_tag(raw.payment_frequency)
            .ok_or_else(|| Error::Parse(format!("unknown payment frequency tag {}", raw.payment_frequency)))?;
        Ok(Self {
            payroll: Pubkey::new_from_array(raw.payroll),
            employee_id: raw.employee_id,
            wallet: Pubkey::new_from_array(raw.wallet),
            salary_amount: raw.salary_amount,
            deductions: raw.deductions,
            payment_frequency,
            last_payment: raw.last_payment,
            is_active: raw.is_active,
        })
    }

    /// Encode as raw account data, discriminator included.
    ///
    /// # Errors
    /// Fails only if encoding fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let raw = RawEmployee {
            payroll: self.payroll.to_bytes(),
            employee_id: self.employee_id.clone(),
            wallet: self.wallet.to_bytes(),
            salary_amount: self.salary_amount,
            deductions: self.deductions,
            payment_frequency: self.payment_frequency.tag(),
            last_payment: self.last_payment,
            is_active: self.is_active,
        };
        let mut data = super::anchor::account_discriminator(Self::NAME).to_vec();
        data.extend(encode(&raw)?);
        Ok(data)
    }
}

/// Employee fields `update_employee` overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeTerms {
    pub salary_amount: u64,
    pub payment_frequency: PaymentFrequency,
    pub deductions: u64,
    pub is_active: bool,
}

/// Derives every payroll program address from a configurable program id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayrollProgram {
    pub program_id: Pubkey,
}

impl Default for PayrollProgram {
    fn default() -> Self {
        Self::new(PROGRAM_ID)
    }
}

impl PayrollProgram {
    #[must_use]
    pub const fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    #[must_use]
    pub fn payroll(&self, payroll_id: &str) -> Pubkey {
        Pubkey::find_program_address(&[b"payroll", payroll_id.as_bytes()], &self.program_id).0
    }

    #[must_use]
    pub fn vault(&self, payroll: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[b"vault", payroll.as_ref()], &self.program_id).0
    }

    #[must_use]
    pub fn employee(&self, payroll: &Pubkey, employee_id: &str) -> Pubkey {
        Pubkey::find_program_address(
            &[b"employee", payroll.as_ref(), employee_id.as_bytes()],
            &self.program_id,
        )
        .0
    }

    /// `initialize_payroll(payroll_id, payment_token, tax_rate)`.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn initialize_payroll(
        &self,
        authority: &Pubkey,
        payroll_id: &str,
        payment_token: &Pubkey,
        tax_rate: u16,
    ) -> Result<Instruction> {
        let payroll = self.payroll(payroll_id);
        let args = encode(&(payroll_id, payment_token.to_bytes(), tax_rate))?;
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(payroll, false),
                AccountMeta::new(self.vault(&payroll), false),
                AccountMeta::new_readonly(*payment_token, false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(sysvar::rent::ID, false),
            ],
            data: instruction_data("initialize_payroll", &args),
        })
    }

    /// `add_employee(employee_id, salary, frequency, deductions)`.
    ///
    /// `employee_wallet` is the token account salaries go to.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn add_employee(
        &self,
        authority: &Pubkey,
        payroll_id: &str,
        employee_id: &str,
        employee_wallet: &Pubkey,
        salary_amount: u64,
        frequency: PaymentFrequency,
        deductions: u64,
    ) -> Result<Instruction> {
        let payroll = self.payroll(payroll_id);
        let args = encode(&(employee_id, salary_amount, frequency.tag(), deductions))?;
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(payroll, false),
                AccountMeta::new(self.employee(&payroll, employee_id), false),
                AccountMeta::new_readonly(*employee_wallet, false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(system_program::ID, false),
                AccountMeta::new_readonly(sysvar::rent::ID, false),
            ],
            data: instruction_data("add_employee", &args),
        })
    }

    /// `process_payment(employee_id)`.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn process_payment(
        &self,
        authority: &Pubkey,
        payroll_id: &str,
        employee_id: &str,
        employee_wallet: &Pubkey,
        payment_token: &Pubkey,
    ) -> Result<Instruction> {
        let payroll = self.payroll(payroll_id);
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(payroll, false),
                AccountMeta::new(self.employee(&payroll, employee_id), false),
                AccountMeta::new(self.vault(&payroll), false),
                AccountMeta::new(*employee_wallet, false),
                AccountMeta::new_readonly(*payment_token, false),
                AccountMeta::new_readonly(*authority, true),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("process_payment", &encode(&employee_id)?),
        })
    }

    /// `update_employee(salary, frequency, deductions, is_active)`.
    ///
    /// # Errors
    /// Fails only if argument encoding fails.
    pub fn update_employee(
        &self,
        authority: &Pubkey,
        payroll_id: &str,
        employee_id: &str,
        terms: &EmployeeTerms,
    ) -> Result<Instruction> {
        let payroll = self.payroll(payroll_id);
        let args = encode(&(
            terms.salary_amount,
            terms.payment_frequency.tag(),
            terms.deductions,
            terms.is_active,
        ))?;
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(payroll, false),
                AccountMeta::new(self.employee(&payroll, employee_id), false),
                AccountMeta::new_readonly(*authority, true),
            ],
            data: instruction_data("update_employee", &args),
        })
    }

    /// `deposit_funds(amount)` from `authority_token_account`.
    #[must_use]
    pub fn deposit_funds(
        &self,
        authority: &Pubkey,
        payroll_id: &str,
        authority_token_account: &Pubkey,
        payment_token: &Pubkey,
        amount: u64,
    ) -> Instruction {
        let payroll = self.payroll(payroll_id);
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(payroll, false),
                AccountMeta::new(self.vault(&payroll), false),
                AccountMeta::new(*authority_token_account, false),
                AccountMeta::new_readonly(*payment_token, false),
                AccountMeta::new(*authority, true),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: instruction_data("deposit_funds", &amount.to_le_bytes()),
        }
    }

    /// `pause_payroll()` or `resume_payroll()`.
    #[must_use]
    pub fn set_active(&self, authority: &Pubkey, payroll_id: &str, active: bool) -> Instruction {
        let name = if active { "resume_payroll" } else { "pause_payroll" };
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.payroll(payroll_id), false),
                AccountMeta::new_readonly(*authority, true),
            ],
            data: instruction_data(name, &[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::anchor::account_discriminator;

    #[test]
    fn payroll_account_decodes_with_padding() {
        let account = PayrollAccount {
            authority: Pubkey::new_unique().to_bytes(),
            payroll_id: "acme".into(),
            payment_token: Pubkey::new_unique().to_bytes(),
            employee_count: 2,
            is_active: true,
            tax_rate: 1_500,
            total_funds: 10_000,
        };
        let mut data = account_discriminator(PayrollAccount::NAME).to_vec();
        data.extend(borsh::to_vec(&account).unwrap());
        data.extend([0u8; 32]);

        assert_eq!(PayrollAccount::decode(&data).unwrap(), account);
    }

    #[test]
    fn employee_encode_decode_preserves_fields() {
        let employee = EmployeeAccount {
            payroll: Pubkey::new_unique(),
            employee_id: "alice".into(),
            wallet: Pubkey::new_unique(),
            salary_amount: 5_000,
            deductions: 100,
            payment_frequency: PaymentFrequency::BiWeekly,
            last_payment: 1_700_000_000,
            is_active: true,
        };
        let data = employee.encode().unwrap();

        assert_eq!(&data[8..40], employee.payroll.as_ref());
        assert_eq!(EmployeeAccount::decode(&data).unwrap(), employee);
    }

    #[test]
    fn employee_with_unknown_frequency_fails() {
        let mut data = EmployeeAccount {
            payroll: Pubkey::new_unique(),
            employee_id: "a".into(),
            wallet: Pubkey::new_unique(),
            salary_amount: 1,
            deductions: 0,
            payment_frequency: PaymentFrequency::Weekly,
            last_payment: 0,
            is_active: true,
        }
        .encode()
        .unwrap();
        // discriminator + payroll + (len + "a") + wallet + salary + deductions
        let tag_offset = 8 + 32 + 5 + 32 + 8 + 8;
        data[tag_offset] = 7;

        assert!(EmployeeAccount::decode(&data).is_err());
    }

    #[test]
    fn pdas_depend_on_ids() {
        let program = PayrollProgram::default();
        let a = program.payroll("a");
        assert_ne!(a, program.payroll("b"));
        assert_ne!(program.employee(&a, "x"), program.employee(&a, "y"));
        assert_ne!(program.vault(&a), a);
    }

    #[test]
    fn process_payment_discriminator_and_argument() {
        let program = PayrollProgram::default();
        let ix = program
            .process_payment(&Pubkey::new_unique(), "acme", "bob", &Pubkey::new_unique(), &Pubkey::new_unique())
            .unwrap();

        assert_eq!(&ix.data[..8], &[189, 81, 30, 198, 139, 186, 115, 23]);
        assert_eq!(&ix.data[8..12], &3u32.to_le_bytes());
        assert_eq!(&ix.data[12..], b"bob");
    }

    #[test]
    fn pause_and_resume_use_distinct_instructions() {
        let program = PayrollProgram::default();
        let authority = Pubkey::new_unique();
        assert_ne!(
            program.set_active(&authority, "acme", true).data,
            program.set_active(&authority, "acme", false).data
        );
    }
}
