//! SQLite database modules.
//!
//! Connection pooling and migrations, the Diesel schema, and row types for
//! users and payment history.

pub mod connection;
pub mod model;
pub mod schema;
