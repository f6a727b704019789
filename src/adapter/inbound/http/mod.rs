//! JSON HTTP API served with warp.
//!
//! Routes are grouped into attenomics (prices, quotes, trades, protocol
//! setup), auth and payroll. Payroll routes require a bearer token; errors
//! become `{ error, details }` bodies with a status derived from the error.

pub mod dto;
pub mod error;
pub mod filter;
pub mod handler;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::routes;
pub use server::serve;
pub use state::{AppState, Defaults};
