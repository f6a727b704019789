//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for secrets and deployment-specific values: `JWT_SECRET`, `SOLANA_RPC_URL`
//! and `PORT`.
//!
//! # Example
//!
//! ```no_run
//! use attenomics::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::service::{AuthConfig, SchedulerConfig, ServerConfig, SolanaConfig};
use crate::adapter::outbound::solana::parse_commitment;
use crate::domain::payroll::validate_identifier;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional. Load from a TOML file using [`Config::load`]
/// or parse directly with [`Config::parse_toml`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener.
    pub server: ServerConfig,

    /// Cluster endpoint, service wallet and program ids.
    pub solana: SolanaConfig,

    /// Token lifetime and password hashing.
    pub auth: AuthConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "attenomics.db" in the current directory.
    pub database: String,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Periodic payroll runs.
    pub scheduler: SchedulerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            solana: SolanaConfig::default(),
            auth: AuthConfig::default(),
            database: default_database_path(),
            logging: LoggingConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

fn default_database_path() -> String {
    "attenomics.db".to_string()
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

impl Config {
    /// Parse configuration from TOML content, applying overrides from the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - An override such as `PORT` is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_toml_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`], reading overrides through `env`.
    ///
    /// # Errors
    /// See [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn parse_toml_with_env(content: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets come from the environment only, never from the file.
        config.auth.jwt_secret = env("JWT_SECRET");
        if let Some(url) = env("SOLANA_RPC_URL") {
            config.solana.rpc_url = url;
        }
        if let Some(port) = env("PORT") {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|_| invalid("PORT", format!("{port} is not a port number")))?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges. The JWT secret is checked when the server starts,
    /// so that commands without auth (such as `migrate`) run without it.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.server.addr()?;

        if self.solana.rpc_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "solana.rpc_url" }.into());
        }
        parse_commitment(&self.solana.commitment)?;
        if self.solana.keypair_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "solana.keypair_path",
            }
            .into());
        }
        self.solana.attenomics()?;
        self.solana.payroll()?;
        self.solana.payment_token()?;
        self.solana.gaslite_drop(&solana_sdk::pubkey::Pubkey::default())?;
        self.solana.protocol_fee(&solana_sdk::pubkey::Pubkey::default())?;

        if self.auth.token_ttl_secs <= 0 {
            return Err(invalid("auth.token_ttl_secs", "must be greater than 0").into());
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.auth.hash_cost) {
            return Err(invalid(
                "auth.hash_cost",
                format!("must be between {MIN_HASH_COST} and {MAX_HASH_COST}"),
            )
            .into());
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        self.logging.validate()?;

        if self.scheduler.enabled {
            if self.scheduler.interval_secs == 0 {
                return Err(invalid("scheduler.interval_secs", "must be greater than 0").into());
            }
            if self.scheduler.payroll_ids.is_empty() {
                return Err(invalid(
                    "scheduler.payroll_ids",
                    "must name at least one payroll when the scheduler is enabled",
                )
                .into());
            }
            for id in &self.scheduler.payroll_ids {
                validate_identifier("payrollId", id)
                    .map_err(|e| invalid("scheduler.payroll_ids", e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse_toml_with_env("", no_env).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert!(!config.scheduler.enabled);
    }

    #[test]
    fn environment_overrides_file() {
        let toml = r#"
            [server]
            port = 8080

            [solana]
            rpc_url = "http://file:8899"
        "#;
        let config = Config::parse_toml_with_env(toml, |key| match key {
            "PORT" => Some("9090".into()),
            "SOLANA_RPC_URL" => Some("http://env:8899".into()),
            "JWT_SECRET" => Some("s3cret".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.solana.rpc_url, "http://env:8899");
        assert_eq!(config.auth.secret().unwrap(), "s3cret");
    }

    #[test]
    fn missing_secret_is_reported_on_use() {
        let config = Config::parse_toml_with_env("", no_env).unwrap();
        assert!(matches!(
            config.auth.secret(),
            Err(Error::Config(ConfigError::MissingField { field: "JWT_SECRET" }))
        ));
    }

    #[test]
    fn malformed_port_override_is_rejected() {
        let result = Config::parse_toml_with_env("", |key| (key == "PORT").then(|| "http".into()));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { field: "PORT", .. }))
        ));
    }

    #[test]
    fn bad_program_id_is_rejected() {
        let toml = r#"
            [solana]
            payroll_program_id = "nope"
        "#;
        assert!(matches!(
            Config::parse_toml_with_env(toml, no_env),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "solana.payroll_program_id",
                ..
            }))
        ));
    }

    #[test]
    fn enabled_scheduler_needs_payrolls() {
        let toml = r#"
            [scheduler]
            enabled = true
        "#;
        assert!(matches!(
            Config::parse_toml_with_env(toml, no_env),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "scheduler.payroll_ids",
                ..
            }))
        ));
    }

    #[test]
    fn unknown_commitment_is_rejected() {
        let toml = r#"
            [solana]
            commitment = "eventually"
        "#;
        assert!(Config::parse_toml_with_env(toml, no_env).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Config::parse_toml_with_env("[server", no_env),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }
}
