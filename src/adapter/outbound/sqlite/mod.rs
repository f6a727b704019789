//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the user and payment history
//! stores using Diesel ORM.

pub mod database;
pub mod payment;
pub mod user;

pub use payment::SqlitePaymentStore;
pub use user::SqliteUserStore;
