//! Service configuration for the HTTP server, the Solana cluster, auth and
//! the payroll scheduler.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::error::{ConfigError, Result};
use crate::program::{attenomics, payroll, Attenomics, PayrollProgram};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Overridden by the `PORT` environment variable.
    pub port: u16,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] if `host` is not an IP address.
    pub fn addr(&self) -> Result<SocketAddr> {
        let ip = IpAddr::from_str(&self.host).map_err(|e| ConfigError::InvalidValue {
            field: "server.host",
            reason: e.to_string(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Cluster endpoint, wallet and program addresses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolanaConfig {
    /// Overridden by the `SOLANA_RPC_URL` environment variable.
    pub rpc_url: String,
    /// `processed`, `confirmed` or `finalized`.
    pub commitment: String,
    /// Solana CLI keypair file of the service wallet.
    pub keypair_path: String,
    pub attenomics_program_id: String,
    pub payroll_program_id: String,
    /// Mint new payrolls pay salaries in unless a request names another.
    pub payment_token_mint: String,
    /// Defaults to the service wallet.
    pub gaslite_drop_address: Option<String>,
    /// Defaults to the service wallet.
    pub protocol_fee_address: Option<String>,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".into(),
            commitment: "confirmed".into(),
            keypair_path: "keypair.json".into(),
            attenomics_program_id: attenomics::PROGRAM_ID.to_string(),
            payroll_program_id: payroll::PROGRAM_ID.to_string(),
            payment_token_mint: "J1q7FEiMhzgd1T9bGtdh8ZTZa8mhsyszaW4AqQPvYxWX".into(),
            gaslite_drop_address: None,
            protocol_fee_address: None,
        }
    }
}

fn pubkey(field: &'static str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| {
        ConfigError::InvalidValue {
            field,
            reason: format!("{value}: {e}"),
        }
        .into()
    })
}

impl SolanaConfig {
    /// # Errors
    /// [`ConfigError::InvalidValue`] if the program id is not a public key.
    pub fn attenomics(&self) -> Result<Attenomics> {
        Ok(Attenomics::new(pubkey(
            "solana.attenomics_program_id",
            &self.attenomics_program_id,
        )?))
    }

    /// # Errors
    /// [`ConfigError::InvalidValue`] if the program id is not a public key.
    pub fn payroll(&self) -> Result<PayrollProgram> {
        Ok(PayrollProgram::new(pubkey(
            "solana.payroll_program_id",
            &self.payroll_program_id,
        )?))
    }

    /// # Errors
    /// [`ConfigError::InvalidValue`] if the mint is not a public key.
    pub fn payment_token(&self) -> Result<Pubkey> {
        pubkey("solana.payment_token_mint", &self.payment_token_mint)
    }

    /// Gaslite drop address, or `wallet` when unset.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] if the address is not a public key.
    pub fn gaslite_drop(&self, wallet: &Pubkey) -> Result<Pubkey> {
        self.gaslite_drop_address
            .as_deref()
            .map_or(Ok(*wallet), |v| pubkey("solana.gaslite_drop_address", v))
    }

    /// Protocol fee address, or `wallet` when unset.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] if the address is not a public key.
    pub fn protocol_fee(&self, wallet: &Pubkey) -> Result<Pubkey> {
        self.protocol_fee_address
            .as_deref()
            .map_or(Ok(*wallet), |v| pubkey("solana.protocol_fee_address", v))
    }
}

/// Token issuing settings. The signing secret never comes from the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_ttl_secs: i64,
    /// bcrypt work factor.
    pub hash_cost: u32,
    /// Loaded from `JWT_SECRET` at runtime.
    #[serde(skip)]
    pub jwt_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3600,
            hash_cost: bcrypt::DEFAULT_COST,
            jwt_secret: None,
        }
    }
}

impl AuthConfig {
    /// The JWT signing secret.
    ///
    /// # Errors
    /// [`ConfigError::MissingField`] when `JWT_SECRET` was not set.
    pub fn secret(&self) -> Result<&str> {
        self.jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingField { field: "JWT_SECRET" }.into())
    }
}

/// Periodic payroll runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub payroll_ids: Vec<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 86_400,
            payroll_ids: Vec::new(),
        }
    }
}
