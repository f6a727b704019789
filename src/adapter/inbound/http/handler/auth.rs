//! Registration and login.

use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

use super::reply::ok;
use crate::adapter::inbound::http::dto::{LoginBody, RegisterBody, SessionResponse};
use crate::adapter::inbound::http::error::reject;
use crate::adapter::inbound::http::state::AppState;
use crate::application::auth::Registration;

/// Create an account and return a session for it.
pub async fn register(body: RegisterBody, state: AppState) -> Result<Response, Rejection> {
    let registration = Registration {
        email: body.email,
        password: body.password.clone(),
        role: body.role,
        employee_id: body.employee_id,
    };
    let user = state.auth.register(registration).await.map_err(reject)?;
    let session = state
        .auth
        .login(&user.email, &body.password)
        .await
        .map_err(reject)?;
    let reply = warp::reply::json(&SessionResponse::from(&session));
    Ok(warp::reply::with_status(reply, StatusCode::CREATED).into_response())
}

pub async fn login(body: LoginBody, state: AppState) -> Result<Response, Rejection> {
    let session = state
        .auth
        .login(&body.email, &body.password)
        .await
        .map_err(reject)?;
    Ok(ok(&SessionResponse::from(&session)))
}
