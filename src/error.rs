use thiserror::Error;

use crate::domain::error::{DomainError, PricingError};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Pre-submission trade rejections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("bonding curve not found for mint {mint}")]
    CurveNotFound { mint: String },

    #[error("{account} does not exist")]
    AccountMissing { account: String },

    #[error("insufficient {asset} balance: required {required}, available {available}")]
    InsufficientBalance {
        asset: &'static str,
        required: u128,
        available: u128,
    },

    #[error("curve vault cannot cover {required} lamports, holds {available}")]
    VaultShortfall { required: u128, available: u128 },

    #[error("expected output {expected} is below minimum {minimum}")]
    SlippageExceeded { expected: u128, minimum: u128 },

    #[error("cost {cost} exceeds maximum input {maximum}")]
    MaxInputExceeded { cost: u128, maximum: u128 },

    #[error("swap would return zero tokens")]
    ZeroOutput,

    #[error("source and target mints must differ")]
    SameMint,
}

/// Authentication and authorization failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("role {role} may not access this resource")]
    Forbidden { role: String },

    #[error("failed to hash password: {0}")]
    Hashing(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("chain error: {0}")]
    Chain(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<solana_client::client_error::ClientError> for Error {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        Error::Chain(err.to_string())
    }
}
