use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db::ping;
use crate::state::AppState;

/// GET /health
/// Reports service version and whether the database answers a trivial query.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let database = match ping(&state.db).await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!("Health check could not reach the database: {e}");
            "unreachable"
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "database": database,
    }))
}
