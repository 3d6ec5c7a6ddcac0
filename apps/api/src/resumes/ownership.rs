use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decides whether `caller` may act on a resume owned by `owner`.
///
/// A resume without an owner is a guest resume: anyone holding its id may
/// read and write it, anonymous callers included. An owned resume only
/// admits its owner.
pub fn authorize(owner: Option<Uuid>, caller: Option<Uuid>) -> Access {
    match owner {
        None => Access::Allow,
        Some(owner) if caller == Some(owner) => Access::Allow,
        Some(_) => Access::Deny,
    }
}

/// Looks up the resume's owner and applies [`authorize`].
pub async fn ensure_resume_access(
    pool: &PgPool,
    resume_id: Uuid,
    caller: Option<Uuid>,
) -> Result<(), AppError> {
    let owner: Option<Option<Uuid>> = sqlx::query_scalar("SELECT user_id FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await?;
    let owner = owner.ok_or_else(|| AppError::NotFound("Resume not found".into()))?;

    check(owner, caller)
}

pub(crate) fn check(owner: Option<Uuid>, caller: Option<Uuid>) -> Result<(), AppError> {
    match authorize(owner, caller) {
        Access::Allow => Ok(()),
        Access::Deny => Err(AppError::Forbidden),
    }
}
