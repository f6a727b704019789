//! Payroll rules: payment schedules, net pay and identifier limits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Longest payroll or employee id the program accepts.
pub const MAX_ID_LEN: usize = 64;

/// Tax rates are expressed in basis points of the gross salary.
pub const MAX_TAX_RATE_BPS: u16 = 10_000;

const SECONDS_PER_DAY: i64 = 86_400;

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Weekly,
    BiWeekly,
    Monthly,
}

impl PaymentFrequency {
    /// Interval between payments in seconds.
    #[must_use]
    pub const fn interval_secs(self) -> i64 {
        match self {
            Self::Weekly => 7 * SECONDS_PER_DAY,
            Self::BiWeekly => 14 * SECONDS_PER_DAY,
            Self::Monthly => 30 * SECONDS_PER_DAY,
        }
    }

    /// Borsh enum tag used by the payroll program.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Weekly => 0,
            Self::BiWeekly => 1,
            Self::Monthly => 2,
        }
    }

    /// Inverse of [`PaymentFrequency::tag`].
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Weekly),
            1 => Some(Self::BiWeekly),
            2 => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "biweekly",
            Self::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

impl FromStr for PaymentFrequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" => Ok(Self::BiWeekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(DomainError::UnknownFrequency(s.to_string())),
        }
    }
}

/// Breakdown of a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBreakdown {
    pub gross: u64,
    pub tax: u64,
    pub deductions: u64,
    pub net: u64,
}

/// Compute net pay as `salary - salary * tax_rate / 10000 - deductions`.
///
/// # Errors
/// Fails when the tax rate is out of range, the salary is zero, or the
/// deductions exceed what remains after tax.
pub fn compute_net_pay(
    salary: u64,
    tax_rate_bps: u16,
    deductions: u64,
) -> Result<PayBreakdown, DomainError> {
    validate_tax_rate(tax_rate_bps)?;
    if salary == 0 {
        return Err(DomainError::NonPositiveSalary);
    }
    // u64 * 10000 fits in u128; the quotient is at most `salary`.
    let tax = (u128::from(salary) * u128::from(tax_rate_bps) / u128::from(MAX_TAX_RATE_BPS)) as u64;
    let after_tax = salary - tax;
    let net = after_tax
        .checked_sub(deductions)
        .ok_or(DomainError::DeductionsExceedSalary {
            deductions,
            after_tax,
        })?;
    Ok(PayBreakdown {
        gross: salary,
        tax,
        deductions,
        net,
    })
}

/// Next unix timestamp a payment becomes due. `None` if never paid.
#[must_use]
pub fn next_due(last_payment: i64, frequency: PaymentFrequency) -> Option<i64> {
    (last_payment > 0).then(|| last_payment.saturating_add(frequency.interval_secs()))
}

/// Whether a payment is due at `now`.
#[must_use]
pub fn is_payment_due(last_payment: i64, frequency: PaymentFrequency, now: i64) -> bool {
    next_due(last_payment, frequency).map_or(true, |due| now >= due)
}

/// Validate a tax rate in basis points.
///
/// # Errors
/// Fails above 10000.
pub fn validate_tax_rate(tax_rate_bps: u16) -> Result<(), DomainError> {
    if tax_rate_bps > MAX_TAX_RATE_BPS {
        return Err(DomainError::InvalidTaxRate {
            tax_rate: u32::from(tax_rate_bps),
        });
    }
    Ok(())
}

/// Validate a payroll or employee identifier.
///
/// # Errors
/// Fails when empty or longer than [`MAX_ID_LEN`] bytes.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidIdentifier {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    if value.len() > MAX_ID_LEN {
        return Err(DomainError::InvalidIdentifier {
            field,
            reason: format!("must be at most {MAX_ID_LEN} characters"),
        });
    }
    Ok(())
}
