//! SQLite payment history store.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use super::database::connection::DbPool;
use super::database::model::{NewPaymentRow, PaymentRow};
use super::database::schema::payment_history;
use crate::domain::payment::{PaymentQuery, PaymentRecord};
use crate::error::{Error, Result};
use crate::port::PaymentStore;

#[derive(diesel::QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    #[diesel(column_name = "id")]
    id: i64,
}

/// Fixed-width UTC timestamp so text ordering matches time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_column(field: &str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| Error::Database(format!("{field} {value} exceeds column range")))
}

fn from_column(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Parse(format!("negative {field} in payment history")))
}

/// SQLite-backed [`PaymentStore`].
pub struct SqlitePaymentStore {
    pool: DbPool,
}

impl SqlitePaymentStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(record: &PaymentRecord) -> Result<NewPaymentRow> {
        Ok(NewPaymentRow {
            payroll_id: record.payroll_id.clone(),
            employee_id: record.employee_id.clone(),
            amount: to_column("amount", record.amount)?,
            tax_amount: to_column("tax_amount", record.tax_amount)?,
            deductions: to_column("deductions", record.deductions)?,
            net_amount: to_column("net_amount", record.net_amount)?,
            signature: record.signature.clone(),
            paid_at: timestamp(&record.paid_at),
        })
    }

    fn from_row(row: PaymentRow) -> Result<PaymentRecord> {
        let paid_at = DateTime::parse_from_rfc3339(&row.paid_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);
        Ok(PaymentRecord {
            id: row.id.map(i64::from),
            payroll_id: row.payroll_id,
            employee_id: row.employee_id,
            amount: from_column("amount", row.amount)?,
            tax_amount: from_column("tax_amount", row.tax_amount)?,
            deductions: from_column("deductions", row.deductions)?,
            net_amount: from_column("net_amount", row.net_amount)?,
            signature: row.signature,
            paid_at,
        })
    }
}

#[async_trait]
impl PaymentStore for SqlitePaymentStore {
    async fn record(&self, payment: &PaymentRecord) -> Result<i64> {
        let row = Self::to_row(payment)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        conn.transaction(|conn| {
            diesel::insert_into(payment_history::table)
                .values(&row)
                .execute(conn)?;
            diesel::sql_query("SELECT last_insert_rowid() AS id")
                .get_result::<LastInsertRowId>(conn)
                .map(|row| row.id)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn history(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let mut select = payment_history::table
            .select(PaymentRow::as_select())
            .filter(payment_history::payroll_id.eq(&query.payroll_id))
            .into_boxed();
        if let Some(employee_id) = &query.employee_id {
            select = select.filter(payment_history::employee_id.eq(employee_id));
        }
        if let Some(start) = &query.start {
            select = select.filter(payment_history::paid_at.ge(timestamp(start)));
        }
        if let Some(end) = &query.end {
            select = select.filter(payment_history::paid_at.le(timestamp(end)));
        }

        let rows: Vec<PaymentRow> = select
            .order((payment_history::paid_at.desc(), payment_history::id.desc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
