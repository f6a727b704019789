//! Reusable warp filters: shared state, JSON bodies and bearer auth.

use std::convert::Infallible;

use serde::de::DeserializeOwned;
use warp::{Filter, Rejection};

use super::error::reject;
use super::state::AppState;
use crate::application::{require_role, AuthService, AuthUser};
use crate::domain::user::Role;
use crate::error::AuthError;

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// Roles allowed on admin-only routes.
pub const ADMIN: &[Role] = &[Role::Admin];

/// Roles allowed on routes employees may also call.
pub const ANY_ROLE: &[Role] = &[Role::Admin, Role::Employee];

pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// A size-limited JSON body.
pub fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim()).filter(|t| !t.is_empty())
}

/// Resolve the caller from an `Authorization: Bearer` header.
pub fn authenticated(auth: AuthService) -> impl Filter<Extract = (AuthUser,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let auth = auth.clone();
        async move {
            let token = bearer(header.as_deref()).ok_or_else(|| reject(AuthError::MissingToken))?;
            auth.authenticate(token).await.map_err(reject)
        }
    })
}

/// Like [`authenticated`], but also requires one of `roles`.
pub fn with_role(
    auth: AuthService,
    roles: &'static [Role],
) -> impl Filter<Extract = (AuthUser,), Error = Rejection> + Clone {
    authenticated(auth).and_then(move |user: AuthUser| async move {
        require_role(&user, roles).map_err(reject)?;
        Ok::<_, Rejection>(user)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer(Some("bearer  abc ")), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer(Some("Basic abc")), None);
        assert_eq!(bearer(Some("Bearer ")), None);
        assert_eq!(bearer(Some("abc")), None);
        assert_eq!(bearer(None), None);
    }
}
