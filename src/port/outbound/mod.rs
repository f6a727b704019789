//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the blockchain collaborator and persistence.

pub mod chain;
pub mod store;
