//! Persistence ports for payment history and users.

use async_trait::async_trait;

use crate::domain::id::UserId;
use crate::domain::payment::{PaymentQuery, PaymentRecord};
use crate::domain::user::User;
use crate::error::Result;

/// Storage operations for processed payments.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Append a payment. Returns the assigned id.
    async fn record(&self, payment: &PaymentRecord) -> Result<i64>;

    /// Payments matching `query`, newest first.
    async fn history(&self, query: &PaymentQuery) -> Result<Vec<PaymentRecord>>;
}

/// Storage operations for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `AuthError::EmailTaken` on a duplicate email.
    async fn create(&self, user: &User) -> Result<()>;

    /// Look up a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;
}
