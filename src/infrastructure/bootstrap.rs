//! Composition root: builds adapters and services from configuration and
//! runs the server until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::inbound::http::{self, AppState, Defaults};
use crate::adapter::outbound::solana::{load_keypair, parse_commitment, SolanaRpc};
use crate::adapter::outbound::sqlite::database::connection::{open, DbPool};
use crate::adapter::outbound::sqlite::{SqlitePaymentStore, SqliteUserStore};
use crate::application::{
    AuthService, PayrollScheduler, PayrollService, ProtocolService, QuoteService,
    TradeOrchestrator,
};
use crate::error::Result;
use crate::infrastructure::config::service::SolanaConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::{ChainClient, PaymentStore, UserStore};

/// Everything the server runs.
pub struct Services {
    pub state: AppState,
    /// Present when the scheduler is enabled.
    pub scheduler: Option<PayrollScheduler>,
}

/// Connect to the configured cluster as the configured wallet.
///
/// # Errors
/// Returns an error if the commitment or keypair file is invalid.
pub fn connect(config: &SolanaConfig) -> Result<Arc<SolanaRpc>> {
    let commitment = parse_commitment(&config.commitment)?;
    let payer = load_keypair(&config.keypair_path)?;
    Ok(Arc::new(SolanaRpc::new(config.rpc_url.clone(), commitment, payer)))
}

/// Wire services over `chain` and the SQLite `pool`.
///
/// # Errors
/// Returns an error if an address in the config is invalid or `JWT_SECRET`
/// is unset.
pub fn build(config: &Config, chain: Arc<dyn ChainClient>, pool: DbPool) -> Result<Services> {
    let attenomics = config.solana.attenomics()?;
    let payroll_program = config.solana.payroll()?;
    let wallet = chain.payer();
    let defaults = Defaults {
        payment_token: config.solana.payment_token()?,
        gaslite_drop: config.solana.gaslite_drop(&wallet)?,
        protocol_fee: config.solana.protocol_fee(&wallet)?,
    };

    let payments: Arc<dyn PaymentStore> = Arc::new(SqlitePaymentStore::new(pool.clone()));
    let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(pool));
    let auth = AuthService::new(users, config.auth.secret()?, config.auth.token_ttl_secs)
        .with_hash_cost(config.auth.hash_cost);
    let payroll = PayrollService::new(Arc::clone(&chain), payments, payroll_program);

    let scheduler = config.scheduler.enabled.then(|| {
        PayrollScheduler::new(
            payroll.clone(),
            config.scheduler.payroll_ids.clone(),
            Duration::from_secs(config.scheduler.interval_secs),
        )
    });

    info!(
        wallet = %wallet,
        attenomics_program = %attenomics.program_id,
        payroll_program = %payroll_program.program_id,
        scheduler = scheduler.is_some(),
        "services wired"
    );

    let state = AppState {
        quotes: QuoteService::new(Arc::clone(&chain), attenomics),
        trades: TradeOrchestrator::new(Arc::clone(&chain), attenomics),
        protocol: ProtocolService::new(chain, attenomics),
        payroll,
        auth,
        defaults,
    };
    Ok(Services { state, scheduler })
}

/// Create or upgrade the database schema.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn migrate(config: &Config) -> Result<()> {
    open(&config.database)?;
    info!(database = %config.database, "database is up to date");
    Ok(())
}

async fn stopped(mut stop: watch::Receiver<bool>) {
    while !*stop.borrow() {
        if stop.changed().await.is_err() {
            break;
        }
    }
}

/// Run the HTTP server, and the scheduler when enabled, until Ctrl-C.
///
/// # Errors
/// Returns an error if startup fails or the address cannot be bound.
pub async fn run(config: Config) -> Result<()> {
    let pool = open(&config.database)?;
    let chain = connect(&config.solana)?;
    let services = build(&config, chain, pool)?;
    let addr = config.server.addr()?;

    let (shutdown, stop) = watch::channel(false);
    let scheduler = services
        .scheduler
        .map(|scheduler| tokio::spawn(scheduler.run(stop.clone())));

    let server = http::serve(&services.state, addr, config.server.cors, stopped(stop));
    tokio::pin!(server);

    let result = tokio::select! {
        result = &mut server => result,
        _ = signal::ctrl_c() => {
            info!("shutdown signal received");
            // A closed channel only means every receiver is already gone.
            let _ = shutdown.send(true);
            server.await
        }
    };

    let _ = shutdown.send(true);
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            warn!(error = %e, "payroll scheduler task ended abnormally");
        }
    }
    result
}
