//! Trait definitions (hexagonal ports). Depend only on domain and program layouts.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     HTTP ─────────▶│      Application        │
//!                    │  quote / trade / payroll│
//!                    └───────────┬─────────────┘
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              ▼                                   ▼
//!       ┌─────────────┐                     ┌─────────────┐
//!       │    Chain    │                     │    Store    │
//!       │ (Solana RPC)│                     │  (SQLite)   │
//!       └─────────────┘                     └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ChainReader`], [`ChainWriter`], [`ChainClient`] - Blockchain access
//! - [`PaymentStore`], [`UserStore`] - Persistence

pub mod outbound;

pub use outbound::chain::{ChainClient, ChainReader, ChainWriter};
pub use outbound::store::{PaymentStore, UserStore};
