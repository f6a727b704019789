//! End-to-end HTTP tests over the in-memory chain.

mod support;

use attenomics::program::token::{associated_token_address, WSOL_MINT};
use attenomics::testkit::domain::{curve, employee_account, payroll_account, tokens};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use support::harness::{Harness, PASSWORD};
use warp::http::StatusCode;

#[tokio::test]
async fn health_reports_ok() {
    let h = Harness::new();
    let (status, body) = h.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let h = Harness::new();
    let (status, body) = h.get("/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn quote_buy_prices_whole_tokens() {
    let h = Harness::new();
    let mint = Pubkey::new_unique();
    h.chain.set_curve(&h.attenomics, &mint, curve(0));

    let (status, body) = h
        .get(&format!("/api/attenomics/quote/buy?tokenMint={mint}&amount=1000"), None)
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["tokenMint"], mint.to_string());
    assert_eq!(body["amountBaseUnits"], "1000000000000");
    assert_eq!(body["priceOrProceeds"], "50006");
}

#[tokio::test]
async fn quote_for_missing_curve_is_rejected() {
    let h = Harness::new();
    let mint = Pubkey::new_unique();

    let (status, body) = h
        .get(&format!("/api/attenomics/quote/sell?tokenMint={mint}&amount=1"), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains(&mint.to_string()));
}

#[tokio::test]
async fn malformed_mint_is_a_bad_request() {
    let h = Harness::new();
    let (status, body) = h
        .get("/api/attenomics/token-price?tokenMint=not-a-key", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_str().unwrap().contains("tokenMint"));
}

#[tokio::test]
async fn missing_query_parameter_is_a_bad_request() {
    let h = Harness::new();
    let (status, _) = h.get("/api/attenomics/quote/buy", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn native_buy_submits_one_transaction() {
    let h = Harness::new();
    let mint = Pubkey::new_unique();
    h.chain.set_curve(&h.attenomics, &mint, curve(0));
    h.chain.set_lamports(&h.chain.payer_key(), 1_000_000_000);

    let (status, body) = h
        .post(
            "/api/attenomics/buy",
            None,
            json!({ "tokenMint": mint.to_string(), "amount": "1000" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let submitted = h.chain.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(body["signature"], submitted[0].signature.to_string());
    assert_eq!(body["quote"]["priceOrProceeds"], "50006");
}

#[tokio::test]
async fn buy_over_max_input_submits_nothing() {
    let h = Harness::new();
    let mint = Pubkey::new_unique();
    h.chain.set_curve(&h.attenomics, &mint, curve(0));
    h.chain.set_lamports(&h.chain.payer_key(), 1_000_000_000);

    let (status, _) = h
        .post(
            "/api/attenomics/buy",
            None,
            json!({ "tokenMint": mint.to_string(), "amount": "1000", "maxAmountIn": "0.00001" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn sell_with_funded_vault_succeeds() {
    let h = Harness::new();
    let mint = Pubkey::new_unique();
    let payer = h.chain.payer_key();
    h.chain.set_curve(&h.attenomics, &mint, curve(tokens(1_000)));
    h.chain
        .set_token_balance(&associated_token_address(&payer, &mint), 1_000_000_000_000);
    h.chain
        .set_token_balance(&associated_token_address(&payer, &WSOL_MINT), 0);
    h.chain
        .set_token_balance(&h.attenomics.curve_wsol_vault(&mint), 1_000_000);

    let (status, body) = h
        .post(
            "/api/attenomics/sell",
            None,
            json!({ "tokenMint": mint.to_string(), "amount": 1000 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["quote"]["priceOrProceeds"], "50005");
}

#[tokio::test]
async fn swap_of_a_token_with_itself_is_rejected() {
    let h = Harness::new();
    let mint = Pubkey::new_unique().to_string();

    let (status, _) = h
        .post(
            "/api/attenomics/swap-tokens",
            None,
            json!({ "sourceTokenMint": mint, "targetTokenMint": mint, "amountIn": "1" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_json_body_is_a_bad_request() {
    let h = Harness::new();
    let (status, body) = h.post("/api/attenomics/buy", None, json!({ "amount": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "request rejected");
}

#[tokio::test]
async fn register_then_login() {
    let h = Harness::new();
    h.register("bob@acme.io", "employee", Some("bob")).await;

    let (status, body) = h
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "bob@acme.io", "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "employee");
    assert_eq!(body["user"]["employeeId"], "bob");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let h = Harness::new();
    h.register("bob@acme.io", "employee", Some("bob")).await;

    let (status, _) = h
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "bob@acme.io", "password": "not the password" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let h = Harness::new();
    h.admin().await;

    let (status, _) = h
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "admin@acme.io", "password": PASSWORD, "role": "admin" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn payroll_routes_require_a_token() {
    let h = Harness::new();
    let (status, body) = h
        .post("/api/payroll/initialize", None, json!({ "payrollId": "acme", "taxRate": 1000 }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication required");

    let (status, _) = h
        .post(
            "/api/payroll/initialize",
            Some("garbage"),
            json!({ "payrollId": "acme", "taxRate": 1000 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn employees_cannot_call_admin_routes() {
    let h = Harness::new();
    let token = h.register("bob@acme.io", "employee", Some("bob")).await;

    let (status, _) = h
        .post(
            "/api/payroll/process-all-payments",
            Some(&token),
            json!({ "payrollId": "acme" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn initialize_payroll_returns_its_address() {
    let h = Harness::new();
    let admin = h.admin().await;

    let (status, body) = h
        .post(
            "/api/payroll/initialize",
            Some(&admin),
            json!({ "payrollId": "acme", "taxRate": 1000 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["address"], h.payroll.payroll("acme").to_string());
    assert_eq!(h.chain.submitted().len(), 1);
}

#[tokio::test]
async fn tax_rate_above_100_percent_is_rejected() {
    let h = Harness::new();
    let admin = h.admin().await;

    let (status, _) = h
        .post(
            "/api/payroll/initialize",
            Some(&admin),
            json!({ "payrollId": "acme", "taxRate": 10001 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.chain.submitted().is_empty());
}

#[tokio::test]
async fn paying_an_employee_records_history_they_can_read() {
    let h = Harness::new();
    let admin = h.admin().await;
    let bob_token = h.register("bob@acme.io", "employee", Some("bob")).await;

    let authority = h.chain.payer_key();
    h.chain.set_payroll(
        &h.payroll,
        &payroll_account("acme", &authority, &h.payment_token, 1_000),
    );
    let bob = employee_account(&h.payroll, "acme", "bob", tokens(1_000) as u64, tokens(50) as u64);
    h.chain.set_employee(&h.payroll, &bob);
    h.chain.set_token_balance(&bob.wallet, 0);
    let vault = h.payroll.vault(&h.payroll.payroll("acme"));
    h.chain.set_token_balance(&vault, tokens(10_000) as u64);

    let (status, body) = h
        .post(
            "/api/payroll/process-payment",
            Some(&admin),
            json!({ "payrollId": "acme", "employeeId": "bob" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payment"]["amount"], 1_000_000_000_000u64);
    assert_eq!(body["payment"]["taxAmount"], 100_000_000_000u64);
    assert_eq!(body["payment"]["netAmount"], 850_000_000_000u64);
    assert_eq!(h.payments.all().len(), 1);

    let (status, body) = h
        .get("/api/payroll/payment-history?payrollId=acme&employeeId=alice", Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["employeeId"], "bob");

    let (status, body) = h
        .get("/api/payroll/employee-data?payrollId=acme", Some(&bob_token))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["employeeId"], "bob");
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn underfunded_vault_blocks_payment() {
    let h = Harness::new();
    let admin = h.admin().await;
    let authority = h.chain.payer_key();
    h.chain.set_payroll(
        &h.payroll,
        &payroll_account("acme", &authority, &h.payment_token, 0),
    );
    let bob = employee_account(&h.payroll, "acme", "bob", 1_000, 0);
    h.chain.set_employee(&h.payroll, &bob);
    h.chain.set_token_balance(&bob.wallet, 0);

    let (status, body) = h
        .post(
            "/api/payroll/process-payment",
            Some(&admin),
            json!({ "payrollId": "acme", "employeeId": "bob" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(h.chain.submitted().is_empty());
    assert!(h.payments.all().is_empty());
}

#[tokio::test]
async fn batch_run_reports_each_employee() {
    let h = Harness::new();
    let admin = h.admin().await;
    let authority = h.chain.payer_key();
    h.chain.set_payroll(
        &h.payroll,
        &payroll_account("acme", &authority, &h.payment_token, 0),
    );
    let bob = employee_account(&h.payroll, "acme", "bob", 1_000, 0);
    let mut carol = employee_account(&h.payroll, "acme", "carol", 1_000, 0);
    carol.is_active = false;
    h.chain.set_employee(&h.payroll, &bob);
    h.chain.set_employee(&h.payroll, &carol);
    h.chain.set_token_balance(&bob.wallet, 0);
    h.chain
        .set_token_balance(&h.payroll.vault(&h.payroll.payroll("acme")), 1_000_000);

    let (status, body) = h
        .post(
            "/api/payroll/process-all-payments",
            Some(&admin),
            json!({ "payrollId": "acme" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    let status_of = |id: &str| {
        results
            .iter()
            .find(|r| r["employeeId"] == id)
            .map(|r| r["status"].clone())
            .unwrap()
    };
    assert_eq!(status_of("bob"), "paid");
    assert_eq!(status_of("carol"), "skipped");
}

#[tokio::test]
async fn payroll_data_lists_employees() {
    let h = Harness::new();
    let admin = h.admin().await;
    let authority = h.chain.payer_key();
    h.chain.set_payroll(
        &h.payroll,
        &payroll_account("acme", &authority, &h.payment_token, 500),
    );
    h.chain
        .set_employee(&h.payroll, &employee_account(&h.payroll, "acme", "bob", 1_000, 0));

    let (status, body) = h
        .get("/api/payroll/data?payrollId=acme", Some(&admin))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payroll"]["payrollId"], "acme");
    assert_eq!(body["employees"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_payroll_is_not_found() {
    let h = Harness::new();
    let admin = h.admin().await;

    let (status, _) = h
        .get("/api/payroll/data?payrollId=ghost", Some(&admin))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
