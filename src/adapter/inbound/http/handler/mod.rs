//! Request handlers, one module per route group.

pub mod attenomics;
pub mod auth;
pub mod payroll;
mod reply;
