//! Success replies shared by the handlers.

use serde::Serialize;
use warp::Reply;

/// Reply with `body` as JSON and a 200 status.
pub(crate) fn ok<T: Serialize>(body: &T) -> warp::reply::Response {
    warp::reply::json(body).into_response()
}
