//! Handler for the `check` command.

use crate::infrastructure::config::Config;

/// Print the effective configuration. Loading already validated it.
pub fn execute(config: &Config) {
    println!("Server");
    println!("  listen      {}:{}", config.server.host, config.server.port);
    println!("  cors        {}", config.server.cors);
    println!("Solana");
    println!("  rpc         {}", config.solana.rpc_url);
    println!("  commitment  {}", config.solana.commitment);
    println!("  keypair     {}", config.solana.keypair_path);
    println!("  attenomics  {}", config.solana.attenomics_program_id);
    println!("  payroll     {}", config.solana.payroll_program_id);
    println!("  token       {}", config.solana.payment_token_mint);
    println!("Auth");
    println!("  token ttl   {}s", config.auth.token_ttl_secs);
    println!(
        "  jwt secret  {}",
        if config.auth.jwt_secret.is_some() { "set" } else { "missing" }
    );
    println!("Database      {}", config.database);
    println!("Logging       {} ({})", config.logging.level, config.logging.format);
    if config.scheduler.enabled {
        println!(
            "Scheduler     every {}s for {}",
            config.scheduler.interval_secs,
            config.scheduler.payroll_ids.join(", ")
        );
    } else {
        println!("Scheduler     disabled");
    }
}
