//! Payroll administration: employees, payments and history.
//!
//! Every payment is checked against freshly read payroll, employee and vault
//! state, submitted, then appended to the payment history store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::{info, warn};

use super::account::missing_token_accounts;
use crate::domain::error::DomainError;
use crate::domain::payment::{PaymentQuery, PaymentRecord};
use crate::domain::payroll::{
    compute_net_pay, is_payment_due, next_due, validate_identifier, validate_tax_rate, PaymentFrequency,
};
use crate::error::{Error, Result, TradeError};
use crate::port::{ChainClient, PaymentStore};
use crate::program::payroll::{EmployeeTerms, EMPLOYEE_PAYROLL_OFFSET};
use crate::program::token::associated_token_address;
use crate::program::{EmployeeAccount, PayrollAccount, PayrollProgram};

/// A new employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_id: String,
    /// Wallet owning the token account salaries go to.
    pub owner: Pubkey,
    pub salary_amount: u64,
    pub payment_frequency: PaymentFrequency,
    pub deductions: u64,
}

/// Partial update; unset fields keep their on-chain value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub salary_amount: Option<u64>,
    pub payment_frequency: Option<PaymentFrequency>,
    pub deductions: Option<u64>,
    pub is_active: Option<bool>,
}

impl EmployeeUpdate {
    fn merge(&self, current: &EmployeeAccount) -> EmployeeTerms {
        EmployeeTerms {
            salary_amount: self.salary_amount.unwrap_or(current.salary_amount),
            payment_frequency: self.payment_frequency.unwrap_or(current.payment_frequency),
            deductions: self.deductions.unwrap_or(current.deductions),
            is_active: self.is_active.unwrap_or(current.is_active),
        }
    }
}

/// What happened to one employee in a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PaymentStatus {
    Paid { signature: String, net_amount: u64 },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub employee_id: String,
    #[serde(flatten)]
    pub status: PaymentStatus,
}

/// A payroll with its employees and vault balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollSnapshot {
    pub address: Pubkey,
    pub account: PayrollAccount,
    pub employees: Vec<EmployeeAccount>,
    pub vault_balance: u64,
}

/// One employee's on-chain terms and payment history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeData {
    pub account: EmployeeAccount,
    pub next_due: Option<i64>,
    pub payments: Vec<PaymentRecord>,
}

#[derive(Clone)]
pub struct PayrollService {
    chain: Arc<dyn ChainClient>,
    payments: Arc<dyn PaymentStore>,
    program: PayrollProgram,
}

impl PayrollService {
    pub fn new(chain: Arc<dyn ChainClient>, payments: Arc<dyn PaymentStore>, program: PayrollProgram) -> Self {
        Self {
            chain,
            payments,
            program,
        }
    }

    #[must_use]
    pub const fn program(&self) -> &PayrollProgram {
        &self.program
    }

    async fn payroll(&self, payroll_id: &str) -> Result<PayrollAccount> {
        validate_identifier("payrollId", payroll_id)?;
        let address = self.program.payroll(payroll_id);
        let data = self
            .chain
            .account_data(&address)
            .await?
            .ok_or_else(|| Error::NotFound(format!("payroll {payroll_id}")))?;
        PayrollAccount::decode(&data)
    }

    async fn active_payroll(&self, payroll_id: &str) -> Result<PayrollAccount> {
        let payroll = self.payroll(payroll_id).await?;
        if !payroll.is_active {
            return Err(DomainError::PayrollInactive {
                payroll_id: payroll_id.to_string(),
            }
            .into());
        }
        Ok(payroll)
    }

    async fn employee(&self, payroll_id: &str, employee_id: &str) -> Result<EmployeeAccount> {
        validate_identifier("employeeId", employee_id)?;
        let address = self.program.employee(&self.program.payroll(payroll_id), employee_id);
        let data = self
            .chain
            .account_data(&address)
            .await?
            .ok_or_else(|| Error::NotFound(format!("employee {employee_id} in payroll {payroll_id}")))?;
        EmployeeAccount::decode(&data)
    }

    async fn employees(&self, payroll: &Pubkey) -> Result<Vec<EmployeeAccount>> {
        self.chain
            .program_accounts(&self.program.program_id, EMPLOYEE_PAYROLL_OFFSET, payroll.as_ref())
            .await?
            .iter()
            .map(|(_, data)| EmployeeAccount::decode(data))
            .collect()
    }

    async fn vault_balance(&self, payroll: &Pubkey) -> Result<u64> {
        Ok(self
            .chain
            .token_balance(&self.program.vault(payroll))
            .await?
            .unwrap_or(0))
    }

    pub async fn initialize_payroll(&self, payroll_id: &str, payment_token: &Pubkey, tax_rate: u16) -> Result<Signature> {
        validate_identifier("payrollId", payroll_id)?;
        validate_tax_rate(tax_rate)?;
        let ix = self
            .program
            .initialize_payroll(&self.chain.payer(), payroll_id, payment_token, tax_rate)?;
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(
            payroll_id,
            payment_token = %payment_token,
            tax_rate,
            signature = %signature,
            "payroll initialized"
        );
        Ok(signature)
    }

    /// Register an employee, creating their token account if needed.
    pub async fn add_employee(&self, payroll_id: &str, employee: &NewEmployee) -> Result<Signature> {
        validate_identifier("employeeId", &employee.employee_id)?;
        let payroll = self.active_payroll(payroll_id).await?;
        compute_net_pay(employee.salary_amount, payroll.tax_rate, employee.deductions)?;

        let authority = self.chain.payer();
        let payment_token = payroll.payment_token();
        let wallet = associated_token_address(&employee.owner, &payment_token);
        let mut instructions =
            missing_token_accounts(self.chain.as_ref(), &authority, &[(employee.owner, payment_token)]).await?;
        instructions.push(self.program.add_employee(
            &authority,
            payroll_id,
            &employee.employee_id,
            &wallet,
            employee.salary_amount,
            employee.payment_frequency,
            employee.deductions,
        )?);

        let signature = self.chain.submit(instructions, &[]).await?;
        info!(
            payroll_id,
            employee_id = %employee.employee_id,
            salary = employee.salary_amount,
            frequency = %employee.payment_frequency,
            signature = %signature,
            "employee added"
        );
        Ok(signature)
    }

    /// Pay one employee and record the payment.
    ///
    /// # Errors
    /// Inactive payroll or employee, payment not due, an underfunded vault, a
    /// missing salary account, or chain and store failures.
    pub async fn process_payment(&self, payroll_id: &str, employee_id: &str) -> Result<PaymentRecord> {
        let payroll = self.active_payroll(payroll_id).await?;
        let employee = self.employee(payroll_id, employee_id).await?;
        self.pay(payroll_id, &payroll, &employee, Utc::now()).await
    }

    async fn pay(
        &self,
        payroll_id: &str,
        payroll: &PayrollAccount,
        employee: &EmployeeAccount,
        now: DateTime<Utc>,
    ) -> Result<PaymentRecord> {
        if !employee.is_active {
            return Err(DomainError::EmployeeInactive {
                employee_id: employee.employee_id.clone(),
            }
            .into());
        }
        if !is_payment_due(employee.last_payment, employee.payment_frequency, now.timestamp()) {
            return Err(DomainError::PaymentNotDue {
                employee_id: employee.employee_id.clone(),
                next_due: next_due(employee.last_payment, employee.payment_frequency).unwrap_or_default(),
            }
            .into());
        }
        let pay = compute_net_pay(employee.salary_amount, payroll.tax_rate, employee.deductions)?;

        let address = self.program.payroll(payroll_id);
        let available = self.vault_balance(&address).await?;
        if available < pay.gross {
            return Err(DomainError::InsufficientPayrollFunds {
                required: pay.gross,
                available,
            }
            .into());
        }
        if !self.chain.exists(&employee.wallet).await? {
            return Err(TradeError::AccountMissing {
                account: format!("salary account {} of {}", employee.wallet, employee.employee_id),
            }
            .into());
        }

        let ix = self.program.process_payment(
            &self.chain.payer(),
            payroll_id,
            &employee.employee_id,
            &employee.wallet,
            &payroll.payment_token(),
        )?;
        let signature = self.chain.submit(vec![ix], &[]).await?;

        let mut record = PaymentRecord::new(payroll_id, &employee.employee_id, &pay, signature.to_string(), now);
        record.id = Some(self.payments.record(&record).await?);
        info!(
            payroll_id,
            employee_id = %employee.employee_id,
            gross = pay.gross,
            net = pay.net,
            signature = %signature,
            "payment processed"
        );
        Ok(record)
    }

    /// Pay every employee of a payroll that is due.
    ///
    /// One employee failing does not stop the run.
    pub async fn process_all_payments(&self, payroll_id: &str) -> Result<Vec<PaymentOutcome>> {
        let payroll = self.active_payroll(payroll_id).await?;
        let employees = self.employees(&self.program.payroll(payroll_id)).await?;
        let now = Utc::now();

        let mut outcomes = Vec::with_capacity(employees.len());
        for employee in &employees {
            let status = match self.pay(payroll_id, &payroll, employee, now).await {
                Ok(record) => PaymentStatus::Paid {
                    signature: record.signature,
                    net_amount: record.net_amount,
                },
                Err(Error::Domain(
                    err @ (DomainError::EmployeeInactive { .. } | DomainError::PaymentNotDue { .. }),
                )) => PaymentStatus::Skipped {
                    reason: err.to_string(),
                },
                Err(err) => {
                    warn!(payroll_id, employee_id = %employee.employee_id, error = %err, "payment failed");
                    PaymentStatus::Failed {
                        error: err.to_string(),
                    }
                }
            };
            outcomes.push(PaymentOutcome {
                employee_id: employee.employee_id.clone(),
                status,
            });
        }
        info!(payroll_id, employees = outcomes.len(), "payroll run finished");
        Ok(outcomes)
    }

    /// Apply `update` on top of the employee's current terms.
    pub async fn update_employee(&self, payroll_id: &str, employee_id: &str, update: &EmployeeUpdate) -> Result<Signature> {
        let payroll = self.payroll(payroll_id).await?;
        let current = self.employee(payroll_id, employee_id).await?;
        let terms = update.merge(&current);
        compute_net_pay(terms.salary_amount, payroll.tax_rate, terms.deductions)?;

        let ix = self
            .program
            .update_employee(&self.chain.payer(), payroll_id, employee_id, &terms)?;
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(payroll_id, employee_id, active = terms.is_active, signature = %signature, "employee updated");
        Ok(signature)
    }

    /// Move `amount` payment tokens from the service wallet into the vault.
    pub async fn deposit_funds(&self, payroll_id: &str, amount: u64) -> Result<Signature> {
        if amount == 0 {
            return Err(DomainError::InvalidAmount {
                amount: amount.to_string(),
                reason: "deposit must be positive",
            }
            .into());
        }
        let payroll = self.active_payroll(payroll_id).await?;
        let authority = self.chain.payer();
        let payment_token = payroll.payment_token();
        let source = associated_token_address(&authority, &payment_token);

        let held = self.chain.token_balance(&source).await?.unwrap_or(0);
        if held < amount {
            return Err(TradeError::InsufficientBalance {
                asset: "payment token",
                required: u128::from(amount),
                available: u128::from(held),
            }
            .into());
        }

        let mut instructions =
            missing_token_accounts(self.chain.as_ref(), &authority, &[(authority, payment_token)]).await?;
        instructions.push(
            self.program
                .deposit_funds(&authority, payroll_id, &source, &payment_token, amount),
        );
        let signature = self.chain.submit(instructions, &[]).await?;
        info!(payroll_id, amount, signature = %signature, "funds deposited");
        Ok(signature)
    }

    /// Pause (`false`) or resume (`true`) a payroll.
    pub async fn set_active(&self, payroll_id: &str, active: bool) -> Result<Signature> {
        let payroll = self.payroll(payroll_id).await?;
        if payroll.is_active == active {
            warn!(payroll_id, active, "payroll already in requested state");
        }
        let ix = self.program.set_active(&self.chain.payer(), payroll_id, active);
        let signature = self.chain.submit(vec![ix], &[]).await?;
        info!(payroll_id, active, signature = %signature, "payroll state changed");
        Ok(signature)
    }

    /// Payroll account, employees and vault balance.
    pub async fn payroll_data(&self, payroll_id: &str) -> Result<PayrollSnapshot> {
        let account = self.payroll(payroll_id).await?;
        let address = self.program.payroll(payroll_id);
        let employees = self.employees(&address).await?;
        let vault_balance = self.vault_balance(&address).await?;
        Ok(PayrollSnapshot {
            address,
            account,
            employees,
            vault_balance,
        })
    }

    /// Terms and history of one employee.
    pub async fn employee_data(&self, payroll_id: &str, employee_id: &str) -> Result<EmployeeData> {
        let account = self.employee(payroll_id, employee_id).await?;
        let payments = self
            .payments
            .history(&PaymentQuery {
                employee_id: Some(employee_id.to_string()),
                ..PaymentQuery::for_payroll(payroll_id)
            })
            .await?;
        Ok(EmployeeData {
            next_due: next_due(account.last_payment, account.payment_frequency),
            account,
            payments,
        })
    }

    /// Recorded payments, newest first.
    pub async fn payment_history(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>> {
        validate_identifier("payrollId", &query.payroll_id)?;
        self.payments.history(query).await
    }
}
