pub mod health;

use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::auth::extractors::Identity;
use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::resumes::handlers as resumes;
use crate::resumes::sections::{SectionSpec, SECTIONS};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route(
            "/api/auth/me",
            get(auth::handle_me).delete(auth::handle_delete_me),
        )
        // Resumes
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        );

    for section in &SECTIONS {
        router = router.merge(section_routes(section));
    }

    router.fallback(route_not_found).with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// Add/update/delete routes for one section, all gated by the ownership check.
fn section_routes(section: &'static SectionSpec) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/api/resumes/:id/{}", section.name),
            post(
                move |State(state): State<AppState>,
                      identity: Identity,
                      ApiPath(resume_id): ApiPath<Uuid>,
                      ApiJson(body): ApiJson<Map<String, Value>>| {
                    resumes::handle_add_item(section, state, identity, resume_id, body)
                },
            ),
        )
        .route(
            &format!("/api/resumes/:id/{}/:item_id", section.name),
            put(
                move |State(state): State<AppState>,
                      identity: Identity,
                      ApiPath(ids): ApiPath<(Uuid, Uuid)>,
                      ApiJson(body): ApiJson<Map<String, Value>>| {
                    resumes::handle_update_item(section, state, identity, ids, body)
                },
            )
            .delete(
                move |State(state): State<AppState>,
                      identity: Identity,
                      ApiPath(ids): ApiPath<(Uuid, Uuid)>| {
                    resumes::handle_delete_item(section, state, identity, ids)
                },
            ),
        )
}
