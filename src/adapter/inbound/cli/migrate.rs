//! Handler for the `migrate` command.

use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Config;

/// Execute the migrate command.
pub fn execute(config: &Config) -> Result<()> {
    bootstrap::migrate(config)
}
