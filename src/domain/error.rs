//! Domain errors for curve pricing and payroll rules.
//!
//! [`PricingError`] is the whole error surface of the curve math and swap
//! estimator. [`DomainError`] covers payroll and identifier validation.
//!
//! # Examples
//!
//! ```
//! use attenomics::domain::curve::{quote_sell, CurveState};
//! use attenomics::domain::error::PricingError;
//!
//! let state = CurveState::new(0, 0, 0, 0);
//! let result = quote_sell(&state, 1);
//!
//! assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
//! ```

use thiserror::Error;

/// Errors produced by the curve math and swap estimator.
///
/// All of them are local and recoverable: callers report them as a rejected
/// quote and never retry automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A buy or swap would push supply past the virtual ceiling.
    #[error("insufficient virtual supply: requested {requested}, available {available}")]
    InsufficientVirtualSupply {
        /// Base units requested.
        requested: u128,
        /// Base units still available on the curve.
        available: u128,
    },

    /// The request itself is malformed (zero amount, selling more than supply).
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// An intermediate or final value left the supported integer range.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

impl PricingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors that occur when payroll or identifier rules are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Identifier is empty or too long.
    #[error("invalid {field}: {reason}")]
    InvalidIdentifier {
        /// Which identifier failed.
        field: &'static str,
        /// Why it failed.
        reason: String,
    },

    /// Tax rate outside 0..=10000 basis points.
    #[error("tax rate must be between 0 and 10000 basis points, got {tax_rate}")]
    InvalidTaxRate {
        /// The rejected rate.
        tax_rate: u32,
    },

    /// Salary must be positive.
    #[error("salary must be greater than zero")]
    NonPositiveSalary,

    /// Tax plus deductions exceed the gross salary.
    #[error("deductions {deductions} exceed salary after tax {after_tax}")]
    DeductionsExceedSalary {
        /// Configured deductions.
        deductions: u64,
        /// Salary remaining after tax.
        after_tax: u64,
    },

    /// Unknown payment frequency label.
    #[error("unknown payment frequency: {0}")]
    UnknownFrequency(String),

    /// Payroll is paused.
    #[error("payroll {payroll_id} is not active")]
    PayrollInactive {
        /// The paused payroll.
        payroll_id: String,
    },

    /// Employee is deactivated.
    #[error("employee {employee_id} is not active")]
    EmployeeInactive {
        /// The inactive employee.
        employee_id: String,
    },

    /// The next payment is not due yet.
    #[error("payment for {employee_id} not due until {next_due}")]
    PaymentNotDue {
        /// The employee whose payment was requested.
        employee_id: String,
        /// Unix timestamp of the next due payment.
        next_due: i64,
    },

    /// Payroll vault cannot cover a salary.
    #[error("payroll vault holds {available}, payment needs {required}")]
    InsufficientPayrollFunds {
        /// Gross salary the program transfers.
        required: u64,
        /// Current vault balance.
        available: u64,
    },

    /// Token split percentages do not add up.
    #[error("token allocation percentages must sum to 100, got {total}")]
    InvalidAllocation {
        /// The actual sum.
        total: u32,
    },

    /// Supporter distribution would exceed the supporter allocation.
    #[error("distribution total {required} exceeds supporter allocation {allocation}")]
    DistributionExceedsAllocation {
        /// Tokens the distributor would drip.
        required: u128,
        /// Tokens reserved for supporters.
        allocation: u128,
    },

    /// Decimal amount could not be expressed in base units.
    #[error("invalid amount {amount}: {reason}")]
    InvalidAmount {
        /// The rejected amount as text.
        amount: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
