//! Route table.

use std::convert::Infallible;

use tracing::info;
use warp::filters::BoxedFilter;
use warp::reply::Response;
use warp::{Filter, Reply};

use super::dto::{
    EmployeeQuery, HistoryQuery, PayrollQuery, QuoteQuery, SwapQuoteQuery, TokenMintQuery,
};
use super::error::recover;
use super::filter::{json_body, with_role, with_state, ADMIN, ANY_ROLE};
use super::handler::{attenomics, auth, payroll};
use super::state::AppState;

fn attenomics_routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let health = warp::path!("health")
        .and(warp::get())
        .and_then(attenomics::health);

    let token_price = warp::path!("api" / "attenomics" / "token-price")
        .and(warp::get())
        .and(warp::query::<TokenMintQuery>())
        .and(with_state(state.clone()))
        .and_then(attenomics::token_price);

    let quote_buy = warp::path!("api" / "attenomics" / "quote" / "buy")
        .and(warp::get())
        .and(warp::query::<QuoteQuery>())
        .and(with_state(state.clone()))
        .and_then(attenomics::quote_buy);

    let quote_sell = warp::path!("api" / "attenomics" / "quote" / "sell")
        .and(warp::get())
        .and(warp::query::<QuoteQuery>())
        .and(with_state(state.clone()))
        .and_then(attenomics::quote_sell);

    let quote_swap = warp::path!("api" / "attenomics" / "quote" / "swap")
        .and(warp::get())
        .and(warp::query::<SwapQuoteQuery>())
        .and(with_state(state.clone()))
        .and_then(attenomics::quote_swap);

    let initialize = warp::path!("api" / "attenomics" / "initialize")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::initialize);

    let initialize_swap_router = warp::path!("api" / "attenomics" / "initialize-swap-router")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(attenomics::initialize_swap_router);

    let set_ai_agent = warp::path!("api" / "attenomics" / "set-ai-agent")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::set_ai_agent);

    let deploy = warp::path!("api" / "attenomics" / "deploy-creator-token")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::deploy_creator_token);

    let buy = warp::path!("api" / "attenomics" / "buy")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::buy);

    let sell = warp::path!("api" / "attenomics" / "sell")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::sell);

    let swap = warp::path!("api" / "attenomics" / "swap-tokens")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(attenomics::swap_tokens);

    health
        .or(token_price)
        .unify()
        .or(quote_buy)
        .unify()
        .or(quote_sell)
        .unify()
        .or(quote_swap)
        .unify()
        .or(initialize)
        .unify()
        .or(initialize_swap_router)
        .unify()
        .or(set_ai_agent)
        .unify()
        .or(deploy)
        .unify()
        .or(buy)
        .unify()
        .or(sell)
        .unify()
        .or(swap)
        .unify()
        .boxed()
}

fn auth_routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(auth::register);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(auth::login);

    register.or(login).unify().boxed()
}

fn payroll_routes(state: &AppState) -> BoxedFilter<(Response,)> {
    let admin = || with_role(state.auth.clone(), ADMIN);
    let anyone = || with_role(state.auth.clone(), ANY_ROLE);

    let initialize = warp::path!("api" / "payroll" / "initialize")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::initialize);

    let add_employee = warp::path!("api" / "payroll" / "add-employee")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::add_employee);

    let process_payment = warp::path!("api" / "payroll" / "process-payment")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::process_payment);

    let process_all = warp::path!("api" / "payroll" / "process-all-payments")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::process_all_payments);

    let update_employee = warp::path!("api" / "payroll" / "update-employee")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::update_employee);

    let deposit = warp::path!("api" / "payroll" / "deposit-funds")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::deposit_funds);

    let pause = warp::path!("api" / "payroll" / "pause")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::pause);

    let resume = warp::path!("api" / "payroll" / "resume")
        .and(warp::post())
        .and(admin())
        .and(json_body())
        .and(with_state(state.clone()))
        .and_then(payroll::resume);

    let data = warp::path!("api" / "payroll" / "data")
        .and(warp::get())
        .and(admin())
        .and(warp::query::<PayrollQuery>())
        .and(with_state(state.clone()))
        .and_then(payroll::data);

    let employee_data = warp::path!("api" / "payroll" / "employee-data")
        .and(warp::get())
        .and(anyone())
        .and(warp::query::<EmployeeQuery>())
        .and(with_state(state.clone()))
        .and_then(payroll::employee_data);

    let history = warp::path!("api" / "payroll" / "payment-history")
        .and(warp::get())
        .and(anyone())
        .and(warp::query::<HistoryQuery>())
        .and(with_state(state.clone()))
        .and_then(payroll::payment_history);

    initialize
        .or(add_employee)
        .unify()
        .or(process_payment)
        .unify()
        .or(process_all)
        .unify()
        .or(update_employee)
        .unify()
        .or(deposit)
        .unify()
        .or(pause)
        .unify()
        .or(resume)
        .unify()
        .or(data)
        .unify()
        .or(employee_data)
        .unify()
        .or(history)
        .unify()
        .boxed()
}

/// Every route, with CORS, error recovery and request logging applied.
///
/// With `cors_any_origin` unset, cross-origin requests are refused.
pub fn routes(
    state: &AppState,
    cors_any_origin: bool,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let cors = if cors_any_origin {
        warp::cors().allow_any_origin()
    } else {
        warp::cors()
    }
    .allow_methods(vec!["GET", "POST", "OPTIONS"])
    .allow_headers(vec!["authorization", "content-type"]);

    attenomics_routes(state)
        .or(auth_routes(state))
        .unify()
        .or(payroll_routes(state))
        .unify()
        .with(cors)
        .recover(recover)
        .map(Reply::into_response)
        .with(warp::log::custom(|request| {
            info!(
                method = %request.method(),
                path = request.path(),
                status = request.status().as_u16(),
                elapsed_ms = request.elapsed().as_millis() as u64,
                "http request"
            );
        }))
}
