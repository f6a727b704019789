//! Mapping of crate errors to HTTP responses.

use std::convert::Infallible;

use serde::Serialize;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

use crate::error::{AuthError, Error};

/// A crate error carried through warp's rejection system.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl Reject for ApiError {}

/// Wrap `err` as a warp rejection.
pub fn reject(err: impl Into<Error>) -> Rejection {
    warp::reject::custom(ApiError(err.into()))
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// HTTP status for a crate error.
#[must_use]
pub fn status_of(err: &Error) -> StatusCode {
    match err {
        Error::Pricing(_) | Error::Domain(_) | Error::Trade(_) => StatusCode::BAD_REQUEST,
        Error::Auth(auth) => match auth {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::EmailTaken(_) | AuthError::WeakPassword { .. } => StatusCode::BAD_REQUEST,
            AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        },
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Config(_)
        | Error::Chain(_)
        | Error::Connection(_)
        | Error::Database(_)
        | Error::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn summary(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "request rejected",
        StatusCode::UNAUTHORIZED => "authentication required",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        _ => "internal error",
    }
}

fn body(status: StatusCode, details: Option<String>) -> warp::reply::WithStatus<warp::reply::Json> {
    let body = ErrorBody {
        error: summary(status).to_string(),
        details,
    };
    warp::reply::with_status(warp::reply::json(&body), status)
}

/// Render an error as a `{ error, details }` response.
#[must_use]
pub fn error_reply(err: &Error) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = status_of(err);
    if status.is_server_error() {
        error!(error = %err, "request failed");
    } else {
        warn!(status = status.as_u16(), error = %err, "request rejected");
    }
    body(status, Some(err.to_string()))
}

/// Turn any rejection into a JSON error response.
pub async fn recover(rejection: Rejection) -> Result<impl Reply, Infallible> {
    if let Some(ApiError(err)) = rejection.find::<ApiError>() {
        return Ok(error_reply(err));
    }
    if let Some(e) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        return Ok(body(StatusCode::BAD_REQUEST, Some(e.to_string())));
    }
    if let Some(e) = rejection.find::<warp::reject::InvalidQuery>() {
        return Ok(body(StatusCode::BAD_REQUEST, Some(e.to_string())));
    }
    if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(body(StatusCode::PAYLOAD_TOO_LARGE, Some("request body too large".into())));
    }
    if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(body(StatusCode::METHOD_NOT_ALLOWED, None));
    }
    if rejection.is_not_found() {
        return Ok(body(StatusCode::NOT_FOUND, None));
    }
    error!(rejection = ?rejection, "unhandled rejection");
    Ok(body(StatusCode::INTERNAL_SERVER_ERROR, None))
}
