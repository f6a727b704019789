//! Chain-agnostic domain logic: curve pricing, swap estimation and payroll rules.

pub mod amount;
pub mod curve;
pub mod error;
pub mod id;
pub mod payment;
pub mod payroll;
pub mod swap;
pub mod user;

mod math;

pub use curve::{quote_buy, quote_sell, CurveState, Quote, TradeSide};
pub use error::{DomainError, PricingError};
pub use swap::{quote_swap, SwapQuote};
