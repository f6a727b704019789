//! Builders for curves and payroll accounts used across tests.

use solana_sdk::pubkey::Pubkey;

use crate::domain::curve::{CurveState, SCALE};
use crate::domain::payroll::PaymentFrequency;
use crate::program::payroll::{EmployeeAccount, PayrollAccount, PayrollProgram};

/// Whole tokens expressed in base units.
pub const fn tokens(whole: u128) -> u128 {
    whole * SCALE
}

/// A curve at `supply` with the default price and no fees.
pub const fn curve(supply: u128) -> CurveState {
    CurveState::new(supply, 0, 0, 0)
}

/// A curve at `supply` charging `fee_bps` on both sides.
pub const fn curve_with_fees(supply: u128, fee_bps: u16) -> CurveState {
    CurveState::new(supply, 0, fee_bps, fee_bps)
}

/// An active payroll owned by `authority`.
pub fn payroll_account(payroll_id: &str, authority: &Pubkey, payment_token: &Pubkey, tax_rate: u16) -> PayrollAccount {
    PayrollAccount {
        authority: authority.to_bytes(),
        payroll_id: payroll_id.to_string(),
        payment_token: payment_token.to_bytes(),
        employee_count: 0,
        is_active: true,
        tax_rate,
        total_funds: 0,
    }
}

/// An active, never-paid monthly employee of `payroll_id`.
pub fn employee_account(
    program: &PayrollProgram,
    payroll_id: &str,
    employee_id: &str,
    salary_amount: u64,
    deductions: u64,
) -> EmployeeAccount {
    EmployeeAccount {
        payroll: program.payroll(payroll_id),
        employee_id: employee_id.to_string(),
        wallet: Pubkey::new_unique(),
        salary_amount,
        deductions,
        payment_frequency: PaymentFrequency::Monthly,
        last_payment: 0,
        is_active: true,
    }
}
