//! Outbound adapters (driven side).

pub mod solana;
pub mod sqlite;
