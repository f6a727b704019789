//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{payment_history, users};

/// Database row for a payment (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = payment_history)]
pub struct NewPaymentRow {
    pub payroll_id: String,
    pub employee_id: String,
    pub amount: i64,
    pub tax_amount: i64,
    pub deductions: i64,
    pub net_amount: i64,
    pub signature: String,
    pub paid_at: String,
}

/// Database row for a payment (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = payment_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentRow {
    pub id: Option<i32>,
    pub payroll_id: String,
    pub employee_id: String,
    pub amount: i64,
    pub tax_amount: i64,
    pub deductions: i64,
    pub net_amount: i64,
    pub signature: String,
    pub paid_at: String,
}

/// Database row for a user.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub employee_id: Option<String>,
    pub created_at: String,
}
