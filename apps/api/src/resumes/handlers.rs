use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::extractors::{AuthUser, Identity};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::resume::ResumeRow;
use crate::resumes::crud;
use crate::resumes::ownership::ensure_resume_access;
use crate::resumes::sections::SectionSpec;
use crate::resumes::service::{self, ResumeAggregate, ResumeInput};
use crate::state::AppState;

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Identity(caller): Identity,
    ApiJson(input): ApiJson<ResumeInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = service::create_resume(&state.db, caller, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Resume created successfully" })),
    ))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(service::list_resumes(&state.db, user.user_id).await?))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Identity(caller): Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ResumeAggregate>, AppError> {
    Ok(Json(service::get_resume(&state.db, id, caller).await?))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Identity(caller): Identity,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ResumeInput>,
) -> Result<Json<Value>, AppError> {
    ensure_resume_access(&state.db, id, caller).await?;
    service::update_resume(&state.db, id, &input).await?;
    Ok(Json(json!({ "message": "Resume updated" })))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Identity(caller): Identity,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    ensure_resume_access(&state.db, id, caller).await?;
    service::delete_resume(&state.db, id).await?;
    Ok(Json(json!({ "message": "Resume deleted" })))
}

// Section handlers take the section explicitly; the router binds one set per
// entry in SECTIONS.

/// POST /api/resumes/:id/<section>
pub async fn handle_add_item(
    section: &'static SectionSpec,
    state: AppState,
    Identity(caller): Identity,
    resume_id: Uuid,
    body: Map<String, Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    ensure_resume_access(&state.db, resume_id, caller).await?;
    let id = crud::add_item(&state.db, section, resume_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": format!("{} item added", section.name) })),
    ))
}

/// PUT /api/resumes/:id/<section>/:item_id
pub async fn handle_update_item(
    section: &'static SectionSpec,
    state: AppState,
    Identity(caller): Identity,
    (resume_id, item_id): (Uuid, Uuid),
    body: Map<String, Value>,
) -> Result<Json<Value>, AppError> {
    ensure_resume_access(&state.db, resume_id, caller).await?;
    crud::update_item(&state.db, section, resume_id, item_id, &body).await?;
    Ok(Json(
        json!({ "message": format!("{} item updated", section.name) }),
    ))
}

/// DELETE /api/resumes/:id/<section>/:item_id
pub async fn handle_delete_item(
    section: &'static SectionSpec,
    state: AppState,
    Identity(caller): Identity,
    (resume_id, item_id): (Uuid, Uuid),
) -> Result<Json<Value>, AppError> {
    ensure_resume_access(&state.db, resume_id, caller).await?;
    crud::delete_item(&state.db, section, resume_id, item_id).await?;
    Ok(Json(
        json!({ "message": format!("{} item deleted", section.name) }),
    ))
}
