//! HS256 session tokens.
//!
//! A token proves a user id for [`TOKEN_TTL_HOURS`] after issue. There is no
//! refresh flow; clients log in again once a token expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: Uuid,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Encoding/decoding keys built once from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs a token for `user_id` that expires [`TOKEN_TTL_HOURS`] from now.
pub fn issue_token(user_id: Uuid, keys: &JwtKeys) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(&Header::default(), &claims, &keys.encoding)
}

/// Checks signature and expiry, returning the embedded claims.
pub fn verify_token(token: &str, keys: &JwtKeys) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(data.claims)
}

/// Like [`verify_token`] but never fails: anything that does not verify is
/// treated as an anonymous caller.
pub fn identify(token: Option<&str>, keys: &JwtKeys) -> Option<Uuid> {
    token
        .and_then(|t| verify_token(t, keys).ok())
        .map(|claims| claims.sub)
}
