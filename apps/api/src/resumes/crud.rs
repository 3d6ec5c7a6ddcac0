//! Generic add/update/delete over any section in [`SECTIONS`](super::sections::SECTIONS).
//!
//! These functions execute pre-approved statements only. Callers must have
//! run the ownership check for `resume_id` first.

use serde_json::{Map, Value};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resumes::sections::SectionSpec;

pub async fn add_item(
    pool: &PgPool,
    section: &SectionSpec,
    resume_id: Uuid,
    body: &Map<String, Value>,
) -> Result<Uuid, AppError> {
    let values = section.extract_values(body)?;

    let sql = section.insert_sql();
    let mut query = sqlx::query_scalar::<_, Uuid>(&sql).bind(resume_id);
    for value in values {
        query = query.bind(value);
    }
    let item_id = query.fetch_one(pool).await?;

    info!("Added {} item {item_id} to resume {resume_id}", section.name);
    Ok(item_id)
}

/// Fails with `NotFound` when `item_id` does not belong to `resume_id`.
pub async fn update_item(
    pool: &PgPool,
    section: &SectionSpec,
    resume_id: Uuid,
    item_id: Uuid,
    body: &Map<String, Value>,
) -> Result<(), AppError> {
    let values = section.extract_values(body)?;

    let sql = section.update_sql();
    let mut query = sqlx::query(&sql);
    for value in values {
        query = query.bind(value);
    }
    let result = query.bind(item_id).bind(resume_id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(item_not_found(section, item_id));
    }
    info!("Updated {} item {item_id} on resume {resume_id}", section.name);
    Ok(())
}

/// Fails with `NotFound` when `item_id` does not belong to `resume_id`.
pub async fn delete_item(
    pool: &PgPool,
    section: &SectionSpec,
    resume_id: Uuid,
    item_id: Uuid,
) -> Result<(), AppError> {
    let result = sqlx::query(&section.delete_sql())
        .bind(item_id)
        .bind(resume_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(item_not_found(section, item_id));
    }
    info!("Deleted {} item {item_id} from resume {resume_id}", section.name);
    Ok(())
}

/// All rows of one section for a resume, as a JSON array.
pub async fn list_items(
    conn: &mut PgConnection,
    section: &SectionSpec,
    resume_id: Uuid,
) -> Result<Value, AppError> {
    Ok(sqlx::query_scalar::<_, Value>(&section.select_sql())
        .bind(resume_id)
        .fetch_one(conn)
        .await?)
}

fn item_not_found(section: &SectionSpec, item_id: Uuid) -> AppError {
    AppError::NotFound(format!("{} item {item_id} not found", section.name))
}
