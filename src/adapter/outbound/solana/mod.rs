//! Solana cluster access.

pub mod rpc;

pub use rpc::{load_keypair, parse_commitment, SolanaRpc};
