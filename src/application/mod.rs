//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate the chain and store
//! ports to implement the service's use cases.

pub mod account;
pub mod auth;
pub mod payroll;
pub mod protocol;
pub mod quote;
pub mod scheduler;
pub mod trade;

pub use auth::{require_role, AuthService, AuthUser};
pub use payroll::PayrollService;
pub use protocol::ProtocolService;
pub use quote::QuoteService;
pub use scheduler::PayrollScheduler;
pub use trade::TradeOrchestrator;
