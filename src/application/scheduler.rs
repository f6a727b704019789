//! Periodic payroll runs.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use super::payroll::{PaymentOutcome, PaymentStatus, PayrollService};

/// Runs [`PayrollService::process_all_payments`] for a fixed set of payrolls
/// on an interval until shutdown.
pub struct PayrollScheduler {
    payroll: PayrollService,
    payroll_ids: Vec<String>,
    interval: Duration,
}

impl PayrollScheduler {
    pub fn new(payroll: PayrollService, payroll_ids: Vec<String>, interval: Duration) -> Self {
        Self {
            payroll,
            payroll_ids,
            interval,
        }
    }

    /// Process every configured payroll once.
    ///
    /// A payroll that fails as a whole is logged and skipped.
    pub async fn run_once(&self) -> Vec<(String, Vec<PaymentOutcome>)> {
        let mut runs = Vec::with_capacity(self.payroll_ids.len());
        for payroll_id in &self.payroll_ids {
            match self.payroll.process_all_payments(payroll_id).await {
                Ok(outcomes) => {
                    let paid = outcomes
                        .iter()
                        .filter(|o| matches!(o.status, PaymentStatus::Paid { .. }))
                        .count();
                    info!(payroll_id = %payroll_id, paid, total = outcomes.len(), "scheduled payroll run");
                    runs.push((payroll_id.clone(), outcomes));
                }
                Err(e) => error!(payroll_id = %payroll_id, error = %e, "scheduled payroll run failed"),
            }
        }
        runs
    }

    /// Tick until `shutdown` flips to true. The first run happens immediately.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        info!(
            payrolls = self.payroll_ids.len(),
            interval_secs = self.interval.as_secs(),
            "payroll scheduler started"
        );
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("payroll scheduler stopping");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    debug!("payroll scheduler tick");
                    self.run_once().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use solana_sdk::pubkey::Pubkey;

    use super::*;
    use crate::program::PayrollProgram;
    use crate::testkit::chain::MockChain;
    use crate::testkit::domain::{employee_account, payroll_account};
    use crate::testkit::store::MemoryPaymentStore;

    fn scheduler(chain: &Arc<MockChain>, ids: &[&str]) -> PayrollScheduler {
        let service = PayrollService::new(
            chain.clone(),
            Arc::new(MemoryPaymentStore::new()),
            PayrollProgram::default(),
        );
        PayrollScheduler::new(
            service,
            ids.iter().map(|s| (*s).to_string()).collect(),
            Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn missing_payroll_does_not_stop_the_others() {
        let chain = Arc::new(MockChain::new());
        let program = PayrollProgram::default();
        chain.set_payroll(
            &program,
            &payroll_account("acme", &chain.payer_key(), &Pubkey::new_unique(), 0),
        );
        let employee = employee_account(&program, "acme", "bob", 100, 0);
        chain.set_token_balance(&employee.wallet, 0);
        chain.set_employee(&program, &employee);
        chain.set_token_balance(&program.vault(&program.payroll("acme")), 1_000);

        let runs = scheduler(&chain, &["ghost", "acme"]).run_once().await;

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, "acme");
        assert!(matches!(runs[0].1[0].status, PaymentStatus::Paid { net_amount: 100, .. }));
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let chain = Arc::new(MockChain::new());
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(scheduler(&chain, &[]).run(rx));

        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
