//! Handler for the `serve` command.

use tracing::info;

use crate::adapter::inbound::cli::command::ServeArgs;
use crate::adapter::inbound::cli::dispatch::load_config;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Execute the serve command.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, args)?;
    config.init_logging();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        rpc_url = %config.solana.rpc_url,
        "attenomics starting"
    );
    bootstrap::run(config).await?;
    info!("attenomics stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs {
        config.logging.format = "json".into();
    }
    if args.scheduler {
        config.scheduler.enabled = true;
    }
    config.validate()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args() -> ServeArgs {
        ServeArgs {
            config: PathBuf::from("config.toml"),
            port: None,
            log_level: None,
            json_logs: false,
            scheduler: false,
        }
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        let args = ServeArgs {
            port: Some(9000),
            log_level: Some("debug".into()),
            json_logs: true,
            ..args()
        };

        apply_overrides(&mut config, &args).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn forced_scheduler_needs_payrolls() {
        let mut config = Config::default();
        let args = ServeArgs {
            scheduler: true,
            ..args()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = Config::default();
        let args = ServeArgs {
            log_level: Some("[".into()),
            ..args()
        };
        assert!(apply_overrides(&mut config, &args).is_err());
    }
}
