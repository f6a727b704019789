//! In-memory stores for service tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::id::UserId;
use crate::domain::payment::{PaymentQuery, PaymentRecord};
use crate::domain::user::User;
use crate::error::{AuthError, Result};
use crate::port::{PaymentStore, UserStore};

#[derive(Default)]
pub struct MemoryPaymentStore {
    records: Mutex<Vec<PaymentRecord>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<PaymentRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn record(&self, payment: &PaymentRecord) -> Result<i64> {
        let mut records = self.records.lock();
        let id = i64::try_from(records.len()).unwrap_or(i64::MAX) + 1;
        let mut stored = payment.clone();
        stored.id = Some(id);
        records.push(stored);
        Ok(id)
    }

    async fn history(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>> {
        let mut found: Vec<PaymentRecord> = self
            .records
            .lock()
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.paid_at.cmp(&a.paid_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken(user.email.clone()).into());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.lock().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.users.lock().iter().find(|u| &u.id == id).cloned())
    }
}
