//! Session identity and password hashing.
//!
//! Passwords are hashed with argon2id; sessions are opaque HS256 bearer
//! tokens carrying the user's email. Handlers never probe headers
//! themselves: they receive an explicit [`SessionIdentity`] and branch on
//! its variant.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
};

/// Session lifetime before the token expires.
const SESSION_TTL_DAYS: i64 = 7;

/// Hash a password with argon2id and a random salt; the result is a PHC
/// string suitable for storage.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC string. An unparseable hash
/// counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User email
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 signing/verification keys derived from the configured secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a bearer token for the given email.
    pub fn issue(&self, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }

    /// Resolve a token to the email it was issued for. Expired, forged and
    /// malformed tokens all resolve to `None`.
    pub fn verify(&self, token: &str) -> Option<String> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .ok()
    }
}

/// The caller's resolved session identity.
///
/// Resolution never rejects a request by itself; endpoints that require a
/// user decide what `Anonymous` means for them (401, or an empty listing
/// for the lenient ones).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    Authenticated { email: String },
    Anonymous,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| state.sessions.verify(token))
            .map(|email| SessionIdentity::Authenticated { email })
            .unwrap_or(SessionIdentity::Anonymous);

        Ok(identity)
    }
}
