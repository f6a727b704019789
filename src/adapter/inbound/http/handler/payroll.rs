//! Payroll endpoints. Every handler receives the authenticated caller.

use tracing::info;
use warp::reply::Response;
use warp::Rejection;

use super::reply::ok;
use crate::adapter::inbound::http::dto::{
    parse_date, parse_frequency, parse_pubkey, AddEmployeeBody, BatchResponse, DepositBody,
    EmployeeDataResponse, EmployeeQuery, EmployeeRefBody, HistoryQuery, InitializePayrollBody,
    PaymentResponse, PayrollDataResponse, PayrollQuery, PayrollRefBody, SubmittedResponse,
    UpdateEmployeeBody,
};
use crate::adapter::inbound::http::error::reject;
use crate::adapter::inbound::http::state::AppState;
use crate::application::payroll::{EmployeeUpdate, NewEmployee};
use crate::application::AuthUser;
use crate::domain::amount::{to_base_units, to_positive_base_units};
use crate::domain::payment::PaymentQuery;
use crate::domain::user::Role;
use crate::error::{AuthError, Result};

/// The employee id `user` may read data for.
///
/// Employees are pinned to their own id whatever they ask for; admins read
/// whichever id they name.
fn visible_employee(user: &AuthUser, requested: Option<String>) -> Result<Option<String>> {
    match user.role {
        Role::Admin => Ok(requested),
        Role::Employee => match &user.employee_id {
            Some(own) => Ok(Some(own.clone())),
            None => Err(AuthError::Forbidden {
                role: "employee without an employee id".to_string(),
            }
            .into()),
        },
    }
}

fn submitted(message: String, signature: impl ToString) -> Response {
    ok(&SubmittedResponse {
        message,
        signature: signature.to_string(),
        address: None,
    })
}

pub async fn initialize(
    user: AuthUser,
    body: InitializePayrollBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let token = match &body.payment_token {
        Some(token) => parse_pubkey("paymentToken", token).map_err(reject)?,
        None => state.defaults.payment_token,
    };
    let signature = state
        .payroll
        .initialize_payroll(&body.payroll_id, &token, body.tax_rate)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, by = %user.email, "payroll initialized via api");
    Ok(ok(&SubmittedResponse {
        message: format!("payroll {} initialized", body.payroll_id),
        signature: signature.to_string(),
        address: Some(state.payroll.program().payroll(&body.payroll_id).to_string()),
    }))
}

fn new_employee(body: &AddEmployeeBody) -> Result<NewEmployee> {
    Ok(NewEmployee {
        employee_id: body.employee_id.clone(),
        owner: parse_pubkey("employeeWallet", &body.employee_wallet)?,
        salary_amount: to_positive_base_units(body.salary_amount)?,
        payment_frequency: parse_frequency(&body.payment_frequency)?,
        deductions: to_base_units(body.deductions)?,
    })
}

pub async fn add_employee(
    user: AuthUser,
    body: AddEmployeeBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let employee = new_employee(&body).map_err(reject)?;
    let signature = state
        .payroll
        .add_employee(&body.payroll_id, &employee)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, employee_id = %body.employee_id, by = %user.email, "employee added via api");
    Ok(submitted(format!("employee {} added", body.employee_id), signature))
}

pub async fn process_payment(
    user: AuthUser,
    body: EmployeeRefBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let payment = state
        .payroll
        .process_payment(&body.payroll_id, &body.employee_id)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, employee_id = %body.employee_id, by = %user.email, "payment processed via api");
    Ok(ok(&PaymentResponse {
        message: format!("payment processed for employee {}", body.employee_id),
        payment,
    }))
}

pub async fn process_all_payments(
    user: AuthUser,
    body: PayrollRefBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let results = state
        .payroll
        .process_all_payments(&body.payroll_id)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, employees = results.len(), by = %user.email, "payroll run via api");
    Ok(ok(&BatchResponse {
        message: format!("processed payroll {}", body.payroll_id),
        results,
    }))
}

fn employee_update(body: &UpdateEmployeeBody) -> Result<EmployeeUpdate> {
    Ok(EmployeeUpdate {
        salary_amount: body.salary_amount.map(to_positive_base_units).transpose()?,
        payment_frequency: body.payment_frequency.as_deref().map(parse_frequency).transpose()?,
        deductions: body.deductions.map(to_base_units).transpose()?,
        is_active: body.is_active,
    })
}

pub async fn update_employee(
    user: AuthUser,
    body: UpdateEmployeeBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let update = employee_update(&body).map_err(reject)?;
    let signature = state
        .payroll
        .update_employee(&body.payroll_id, &body.employee_id, &update)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, employee_id = %body.employee_id, by = %user.email, "employee updated via api");
    Ok(submitted(format!("employee {} updated", body.employee_id), signature))
}

pub async fn deposit_funds(
    user: AuthUser,
    body: DepositBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let amount = to_positive_base_units(body.amount).map_err(reject)?;
    let signature = state
        .payroll
        .deposit_funds(&body.payroll_id, amount)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, amount, by = %user.email, "deposit via api");
    Ok(submitted(
        format!("deposited {} tokens to payroll {}", body.amount, body.payroll_id),
        signature,
    ))
}

pub async fn pause(
    user: AuthUser,
    body: PayrollRefBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    set_active(user, body, state, false).await
}

pub async fn resume(
    user: AuthUser,
    body: PayrollRefBody,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    set_active(user, body, state, true).await
}

async fn set_active(
    user: AuthUser,
    body: PayrollRefBody,
    state: AppState,
    active: bool,
) -> std::result::Result<Response, Rejection> {
    let signature = state
        .payroll
        .set_active(&body.payroll_id, active)
        .await
        .map_err(reject)?;
    info!(payroll_id = %body.payroll_id, active, by = %user.email, "payroll state changed via api");
    let verb = if active { "resumed" } else { "paused" };
    Ok(submitted(format!("payroll {} {verb}", body.payroll_id), signature))
}

pub async fn data(
    _user: AuthUser,
    query: PayrollQuery,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let snapshot = state
        .payroll
        .payroll_data(&query.payroll_id)
        .await
        .map_err(reject)?;
    Ok(ok(&PayrollDataResponse::from(&snapshot)))
}

pub async fn employee_data(
    user: AuthUser,
    query: EmployeeQuery,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let employee_id = visible_employee(&user, query.employee_id)
        .map_err(reject)?
        .ok_or_else(|| {
            reject(crate::domain::DomainError::InvalidIdentifier {
                field: "employeeId",
                reason: "is required".to_string(),
            })
        })?;
    let data = state
        .payroll
        .employee_data(&query.payroll_id, &employee_id)
        .await
        .map_err(reject)?;
    Ok(ok(&EmployeeDataResponse::from(data)))
}

fn history_query(user: &AuthUser, query: HistoryQuery) -> Result<PaymentQuery> {
    Ok(PaymentQuery {
        employee_id: visible_employee(user, query.employee_id)?,
        start: query
            .start_date
            .as_deref()
            .map(|s| parse_date("startDate", s, false))
            .transpose()?,
        end: query
            .end_date
            .as_deref()
            .map(|s| parse_date("endDate", s, true))
            .transpose()?,
        ..PaymentQuery::for_payroll(query.payroll_id)
    })
}

pub async fn payment_history(
    user: AuthUser,
    query: HistoryQuery,
    state: AppState,
) -> std::result::Result<Response, Rejection> {
    let query = history_query(&user, query).map_err(reject)?;
    let history = state.payroll.payment_history(&query).await.map_err(reject)?;
    Ok(ok(&history))
}
