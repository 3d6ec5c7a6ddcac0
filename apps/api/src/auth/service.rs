use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::jwt::{issue_token, JwtKeys};
use crate::auth::password::{hash_in_background, verify_in_background};
use crate::errors::AppError;
use crate::models::user::{PublicUser, User};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Validated registration input.
#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        match (non_blank(self.username), non_blank(self.email), self.password) {
            (Some(username), Some(email), Some(password)) if !password.is_empty() => Ok(NewUser {
                username: username.trim().to_string(),
                email: normalize_email(&email),
                password,
            }),
            _ => Err(AppError::Validation("All fields are required".into())),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates a user and returns a session token for it.
pub async fn register(pool: &PgPool, keys: &JwtKeys, input: NewUser) -> Result<AuthResponse, AppError> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_in_background(input.password.clone()).await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&input.username)
    .bind(&input.email)
    .bind(&password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        // Lost the race against a concurrent registration with the same email.
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("User already exists".into())
        }
        other => AppError::Database(other),
    })?;

    info!("Registered user {}", user.id);

    let token = issue_token(user.id, keys).context("Failed to sign session token")?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Checks credentials and returns a fresh session token.
pub async fn login(pool: &PgPool, keys: &JwtKeys, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::InvalidCredentials);
    };

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(normalize_email(&email))
        .fetch_optional(pool)
        .await?;

    // Unknown emails still pay for a verification so they cannot be told
    // apart from wrong passwords by timing.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matches = verify_in_background(password, stored_hash).await?;

    let user = match user {
        Some(user) if matches => user,
        _ => return Err(AppError::InvalidCredentials),
    };

    let token = issue_token(user.id, keys).context("Failed to sign session token")?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<PublicUser, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    user.map(PublicUser::from)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Deletes a user; their resumes and every section row go with them via cascade.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!("Deleted user {user_id}");
    Ok(())
}
