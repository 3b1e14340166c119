// storefront/src/services/user_service.rs

use crate::errors::{AppError, Result};
use crate::models::user::User;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>> {
  let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

/// A valid token whose user row is gone still cannot act.
pub async fn require_user(pool: &PgPool, user_id: Uuid) -> Result<User> {
  find_user(pool, user_id)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))
}
