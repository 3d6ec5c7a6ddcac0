use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::auth::extractors::AuthUser;
use crate::auth::service::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::user::PublicUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let input = req.validate()?;
    let response = service::register(&state.db, &state.jwt, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service::login(&state.db, &state.jwt, req).await?))
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(service::find_user(&state.db, user.user_id).await?))
}

/// DELETE /api/auth/me
pub async fn handle_delete_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    service::delete_user(&state.db, user.user_id).await?;
    Ok(Json(json!({ "message": "Account deleted" })))
}
