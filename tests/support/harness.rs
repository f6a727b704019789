//! An HTTP stack over the in-memory chain and stores.

use std::convert::Infallible;
use std::sync::Arc;

use attenomics::adapter::inbound::http::{routes, AppState, Defaults};
use attenomics::application::{
    AuthService, PayrollService, ProtocolService, QuoteService, TradeOrchestrator,
};
use attenomics::program::{Attenomics, PayrollProgram};
use attenomics::testkit::chain::MockChain;
use attenomics::testkit::store::{MemoryPaymentStore, MemoryUserStore};
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub const PASSWORD: &str = "correct horse battery";

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub payments: Arc<MemoryPaymentStore>,
    pub attenomics: Attenomics,
    pub payroll: PayrollProgram,
    pub payment_token: Pubkey,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let chain = Arc::new(MockChain::new());
        let payments = Arc::new(MemoryPaymentStore::new());
        let attenomics = Attenomics::default();
        let payroll = PayrollProgram::default();
        let payment_token = Pubkey::new_unique();
        let wallet = chain.payer_key();

        let auth = AuthService::new(Arc::new(MemoryUserStore::new()), "integration-secret", 3600)
            .with_hash_cost(4);
        let state = AppState {
            quotes: QuoteService::new(chain.clone(), attenomics),
            trades: TradeOrchestrator::new(chain.clone(), attenomics),
            protocol: ProtocolService::new(chain.clone(), attenomics),
            payroll: PayrollService::new(chain.clone(), payments.clone(), payroll),
            auth,
            defaults: Defaults {
                payment_token,
                gaslite_drop: wallet,
                protocol_fee: wallet,
            },
        };

        Self {
            chain,
            payments,
            attenomics,
            payroll,
            payment_token,
            state,
        }
    }

    pub fn api(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone + 'static {
        routes(&self.state, true)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = warp::test::request().method("GET").path(path);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        decode(request.reply(&self.api()).await)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = warp::test::request().method("POST").path(path).json(&body);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {token}"));
        }
        decode(request.reply(&self.api()).await)
    }

    /// Register a user and return its bearer token.
    pub async fn register(&self, email: &str, role: &str, employee_id: Option<&str>) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                    "employeeId": employee_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"]
            .as_str()
            .expect("session token")
            .to_string()
    }

    pub async fn admin(&self) -> String {
        self.register("admin@acme.io", "admin", None).await
    }
}

fn decode(response: warp::http::Response<warp::hyper::body::Bytes>) -> (StatusCode, Value) {
    let status = response.status();
    let body = if response.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(response.body()).expect("json body")
    };
    (status, body)
}
