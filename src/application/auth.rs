//! Registration, login and bearer-token verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::domain::id::UserId;
use crate::domain::user::{Role, User};
use crate::error::{AuthError, Result};
use crate::port::UserStore;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    exp: i64,
}

/// The caller behind a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub employee_id: Option<String>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            employee_id: user.employee_id.clone(),
        }
    }
}

/// Issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

/// A new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub employee_id: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            users,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::seconds(token_ttl_secs),
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor.
    #[must_use]
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Create an account.
    ///
    /// # Errors
    /// [`AuthError::WeakPassword`], [`AuthError::EmailTaken`], or a store error.
    pub async fn register(&self, registration: Registration) -> Result<AuthUser> {
        let email = registration.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::InvalidIdentifier {
                field: "email",
                reason: "must be an email address".to_string(),
            }
            .into());
        }
        if registration.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LEN,
            }
            .into());
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken(email).into());
        }

        let cost = self.hash_cost;
        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = User {
            id: UserId::generate(),
            email,
            password_hash,
            role: registration.role,
            employee_id: registration.employee_id,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(AuthUser::from(&user))
    }

    /// Check credentials and issue a token.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = user.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !verified {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.issue(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(Session {
            token,
            user: AuthUser::from(&user),
        })
    }

    fn issue(&self, user: &User) -> std::result::Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            exp: (Utc::now() + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Resolve a bearer token to its user.
    ///
    /// # Errors
    /// [`AuthError::InvalidToken`] for bad signatures, expired tokens and
    /// deleted users.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| AuthError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(&UserId::new(data.claims.sub))
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(AuthUser::from(&user))
    }
}

/// Reject callers whose role is not in `allowed`.
///
/// # Errors
/// [`AuthError::Forbidden`].
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> std::result::Result<(), AuthError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            role: user.role.to_string(),
        })
    }
}
