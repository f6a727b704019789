//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bonding-curve token launchpad and payroll service
#[derive(Parser, Debug)]
#[command(name = "attenomics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (and the payroll scheduler when enabled)
    Serve(ServeArgs),

    /// Create or upgrade the database schema
    Migrate(ConfigPathArg),

    /// Validate configuration and print the effective settings
    Check(ConfigPathArg),
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override the listen port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Run the payroll scheduler regardless of configuration.
    #[arg(long)]
    pub scheduler: bool,
}

/// A single configuration path argument.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["attenomics", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.port.is_none());
        assert!(!args.json_logs);
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from([
            "attenomics",
            "serve",
            "-c",
            "prod.toml",
            "--port",
            "8080",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.config, PathBuf::from("prod.toml"));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
    }

    #[test]
    fn migrate_takes_config() {
        let cli = Cli::try_parse_from(["attenomics", "migrate", "--config", "x.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Migrate(ConfigPathArg { config }) if config == PathBuf::from("x.toml")));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["attenomics", "trade"]).is_err());
    }
}
