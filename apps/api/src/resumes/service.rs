use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::crud::list_items;
use crate::resumes::ownership;
use crate::resumes::sections::SECTIONS;

/// Title and contact block of a resume, as sent by clients.
#[derive(Debug, Default, Deserialize)]
pub struct ResumeInput {
    pub title: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub summary: Option<String>,
}

impl ResumeInput {
    fn title(&self) -> Result<&str, AppError> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Title is required".into()))
    }
}

/// A resume with every section attached, keyed by section name.
#[derive(Debug, Serialize)]
pub struct ResumeAggregate {
    #[serde(flatten)]
    pub resume: ResumeRow,
    #[serde(flatten)]
    pub sections: BTreeMap<&'static str, Value>,
}

/// Creates a resume owned by `owner`, or a guest resume when `owner` is `None`.
pub async fn create_resume(
    pool: &PgPool,
    owner: Option<Uuid>,
    input: &ResumeInput,
) -> Result<Uuid, AppError> {
    let title = input.title()?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO resumes (user_id, title, full_name, email, phone, address, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(owner)
    .bind(title)
    .bind(&input.full_name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(&input.summary)
    .fetch_one(pool)
    .await?;

    match owner {
        Some(user_id) => info!("Created resume {id} for user {user_id}"),
        None => info!("Created guest resume {id}"),
    }
    Ok(id)
}

/// Resumes owned by `user_id`, newest first. Guest resumes are never listed.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Loads a resume and all of its sections on a single pooled connection.
pub async fn get_resume(
    pool: &PgPool,
    resume_id: Uuid,
    caller: Option<Uuid>,
) -> Result<ResumeAggregate, AppError> {
    let mut conn = pool.acquire().await?;

    let resume: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(&mut *conn)
        .await?;
    let resume = resume.ok_or_else(|| AppError::NotFound("Resume not found".into()))?;

    ownership::check(resume.user_id, caller)?;

    let mut sections = BTreeMap::new();
    for section in &SECTIONS {
        let items = list_items(&mut *conn, section, resume_id).await?;
        sections.insert(section.name, items);
    }

    Ok(ResumeAggregate { resume, sections })
}

/// Replaces the title and contact block. Ownership must already be checked.
pub async fn update_resume(
    pool: &PgPool,
    resume_id: Uuid,
    input: &ResumeInput,
) -> Result<(), AppError> {
    let title = input.title()?;

    let result = sqlx::query(
        r#"
        UPDATE resumes
        SET title = $1, full_name = $2, email = $3, phone = $4,
            address = $5, summary = $6, updated_at = now()
        WHERE id = $7
        "#,
    )
    .bind(title)
    .bind(&input.full_name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.address)
    .bind(&input.summary)
    .bind(resume_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Resume not found".into()));
    }
    info!("Updated resume {resume_id}");
    Ok(())
}

/// Deletes a resume; section rows cascade. Ownership must already be checked.
pub async fn delete_resume(pool: &PgPool, resume_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Resume not found".into()));
    }
    info!("Deleted resume {resume_id}");
    Ok(())
}
