use attenomics::adapter::inbound::cli::{command::Cli, dispatch};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch::execute(cli).await {
        error!(error = %e, "fatal error");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
