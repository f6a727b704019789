//! On-chain program interfaces.
//!
//! Address derivation, account layouts and instruction builders for the
//! creator-token and payroll programs, plus the SPL token helpers both need.

pub mod anchor;
pub mod attenomics;
pub mod payroll;
pub mod token;

pub use attenomics::{Attenomics, BondingCurveAccount, EntryPointAccount};
pub use payroll::{EmployeeAccount, PayrollAccount, PayrollProgram};
