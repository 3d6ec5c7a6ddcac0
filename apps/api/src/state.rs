use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Signing keys derived once from `config.jwt_secret`.
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let jwt = JwtKeys::from_secret(&config.jwt_secret);
        AppState { db, config, jwt }
    }
}
