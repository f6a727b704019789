//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`chain`] - [`MockChain`](chain::MockChain), an in-memory ledger that
//!   records submitted transactions.
//! - [`store`] - In-memory payment and user stores.
//! - [`domain`] - Builders for curves, payroll and employee accounts.

pub mod chain;
pub mod domain;
pub mod store;
