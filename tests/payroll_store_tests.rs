//! Payroll runs persisted to a SQLite file.

use std::sync::Arc;

use attenomics::adapter::outbound::sqlite::database::connection::open;
use attenomics::adapter::outbound::sqlite::SqlitePaymentStore;
use attenomics::application::PayrollService;
use attenomics::domain::payment::PaymentQuery;
use attenomics::domain::DomainError;
use attenomics::error::Error;
use attenomics::port::PaymentStore;
use attenomics::program::PayrollProgram;
use attenomics::testkit::chain::MockChain;
use attenomics::testkit::domain::{employee_account, payroll_account};
use solana_sdk::pubkey::Pubkey;

struct Fixture {
    chain: Arc<MockChain>,
    program: PayrollProgram,
    service: PayrollService,
}

fn fixture(database: &str) -> Fixture {
    let chain = Arc::new(MockChain::new());
    let program = PayrollProgram::default();
    let payments: Arc<dyn PaymentStore> =
        Arc::new(SqlitePaymentStore::new(open(database).unwrap()));
    let service = PayrollService::new(chain.clone(), payments, program);

    let authority = chain.payer_key();
    let payroll = payroll_account("acme", &authority, &Pubkey::new_unique(), 2_000);
    chain.set_payroll(&program, &payroll);
    chain.set_token_balance(&program.vault(&program.payroll("acme")), 1_000_000);

    Fixture {
        chain,
        program,
        service,
    }
}

fn hire(f: &Fixture, employee_id: &str, salary: u64, deductions: u64) {
    let employee = employee_account(&f.program, "acme", employee_id, salary, deductions);
    f.chain.set_token_balance(&employee.wallet, 0);
    f.chain.set_employee(&f.program, &employee);
}

#[tokio::test]
async fn payments_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("payroll.db").to_string_lossy().into_owned();

    {
        let f = fixture(&database);
        hire(&f, "bob", 10_000, 500);
        let record = f.service.process_payment("acme", "bob").await.unwrap();
        assert_eq!(record.id, Some(1));
        assert_eq!(record.tax_amount, 2_000);
        assert_eq!(record.net_amount, 7_500);
    }

    let reopened = SqlitePaymentStore::new(open(&database).unwrap());
    let history = reopened
        .history(&PaymentQuery::for_payroll("acme"))
        .await
        .unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].employee_id, "bob");
    assert_eq!(history[0].amount, 10_000);
}

#[tokio::test]
async fn batch_run_records_only_successful_payments() {
    let f = fixture(":memory:");
    hire(&f, "alice", 1_000, 0);
    hire(&f, "bob", 2_000, 0);
    // Deductions larger than pay after tax.
    hire(&f, "mallory", 1_000, 900);

    let outcomes = f.service.process_all_payments("acme").await.unwrap();
    assert_eq!(outcomes.len(), 3);

    let history = f
        .service
        .payment_history(&PaymentQuery::for_payroll("acme"))
        .await
        .unwrap();
    let mut paid: Vec<&str> = history.iter().map(|p| p.employee_id.as_str()).collect();
    paid.sort_unstable();
    assert_eq!(paid, vec!["alice", "bob"]);
    assert_eq!(f.chain.submitted().len(), 2);
}

#[tokio::test]
async fn paused_payroll_refuses_payments() {
    let f = fixture(":memory:");
    hire(&f, "bob", 1_000, 0);
    let mut paused = payroll_account("acme", &f.chain.payer_key(), &Pubkey::new_unique(), 0);
    paused.is_active = false;
    f.chain.set_payroll(&f.program, &paused);

    let result = f.service.process_payment("acme", "bob").await;

    assert!(matches!(
        result,
        Err(Error::Domain(DomainError::PayrollInactive { .. }))
    ));
    assert!(f
        .service
        .payment_history(&PaymentQuery::for_payroll("acme"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn employee_data_includes_recorded_payments() {
    let f = fixture(":memory:");
    hire(&f, "bob", 1_000, 0);
    f.service.process_payment("acme", "bob").await.unwrap();

    let data = f.service.employee_data("acme", "bob").await.unwrap();

    assert_eq!(data.account.employee_id, "bob");
    assert_eq!(data.payments.len(), 1);
    assert_eq!(data.payments[0].net_amount, 800);
}
