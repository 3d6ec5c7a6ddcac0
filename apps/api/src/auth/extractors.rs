//! Bearer-token extractors.
//!
//! [`Identity`] resolves who is calling and never rejects; [`AuthUser`] is the
//! strict variant for routes that refuse anonymous callers. Whether an
//! identity may touch a given resume is decided separately, in
//! [`crate::resumes::ownership`].

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::{identify, verify_token};
use crate::errors::AppError;
use crate::state::AppState;

/// Authenticated user taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Caller identity for routes open to guests. `None` means anonymous,
/// including when a token is present but does not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub Option<Uuid>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Err(AppError::Unauthorized("No token provided".into()));
        }

        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = verify_token(token, &state.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Identity(identify(bearer_token(parts), &state.jwt)))
    }
}
