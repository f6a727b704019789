//! Payment history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payroll::PayBreakdown;

/// A processed payroll payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Store-assigned id; `None` before the record is saved.
    pub id: Option<i64>,
    pub payroll_id: String,
    pub employee_id: String,
    /// Gross salary paid, in base units.
    pub amount: u64,
    pub tax_amount: u64,
    pub deductions: u64,
    pub net_amount: u64,
    /// Transaction signature.
    pub signature: String,
    pub paid_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Build a record for a payment settled at `paid_at`.
    #[must_use]
    pub fn new(
        payroll_id: impl Into<String>,
        employee_id: impl Into<String>,
        pay: &PayBreakdown,
        signature: impl Into<String>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            payroll_id: payroll_id.into(),
            employee_id: employee_id.into(),
            amount: pay.gross,
            tax_amount: pay.tax,
            deductions: pay.deductions,
            net_amount: pay.net,
            signature: signature.into(),
            paid_at,
        }
    }
}

/// Filter for payment history lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentQuery {
    pub payroll_id: String,
    pub employee_id: Option<String>,
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl PaymentQuery {
    #[must_use]
    pub fn for_payroll(payroll_id: impl Into<String>) -> Self {
        Self {
            payroll_id: payroll_id.into(),
            ..Self::default()
        }
    }

    /// Whether `record` passes this filter.
    #[must_use]
    pub fn matches(&self, record: &PaymentRecord) -> bool {
        record.payroll_id == self.payroll_id
            && self
                .employee_id
                .as_ref()
                .map_or(true, |id| &record.employee_id == id)
            && self.start.map_or(true, |start| record.paid_at >= start)
            && self.end.map_or(true, |end| record.paid_at <= end)
    }
}
