//! Attenomics - creator-token bonding curves and on-chain payroll on Solana.
//!
//! The service quotes and executes trades against per-creator bonding
//! curves, routes token-to-token swaps through the native asset, deploys new
//! creator tokens and runs an employee payroll program, all behind a JSON
//! HTTP API with JWT authentication.
//!
//! # Architecture
//!
//! Hexagonal: [`domain`] holds pure pricing and payroll rules, [`port`]
//! defines the chain and store traits, [`application`] implements the use
//! cases over those ports, and [`adapter`] provides the HTTP API, the CLI,
//! the Solana RPC client and the SQLite stores.
//!
//! # Modules
//!
//! - [`domain`] - Curve math, swap estimation, payroll schedule and tax rules
//! - [`program`] - Account layouts, PDAs and instruction builders for the
//!   on-chain programs
//! - [`port`] - Chain and store traits
//! - [`application`] - Quote, trade, protocol, payroll, auth and scheduler
//!   services
//! - [`adapter`] - HTTP, CLI, Solana RPC and SQLite implementations
//! - [`infrastructure`] - Configuration and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use attenomics::domain::{quote_buy, CurveState};
//!
//! // 1,000 tokens from an empty curve with no fee.
//! let curve = CurveState::new(0, 0, 0, 0);
//! let quote = quote_buy(&curve, 1_000_000_000_000).unwrap();
//! assert_eq!(quote.price_or_proceeds, 50_006);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
pub mod program;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
