//! Command dispatch and config loading shared by the handlers.

use std::path::Path;

use super::command::{Cli, Commands};
use super::{check, migrate, serve};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load `path`, or fall back to defaults plus environment when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Config::parse_toml("")
    }
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::execute(&args).await,
        Commands::Migrate(args) => {
            let config = load_config(&args.config)?;
            config.init_logging();
            migrate::execute(&config)
        }
        Commands::Check(args) => {
            let config = load_config(&args.config)?;
            check::execute(&config);
            Ok(())
        }
    }
}
