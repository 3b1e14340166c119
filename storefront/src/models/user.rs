// storefront/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Credentials live with the external identity service; this row only holds
// what the storefront itself needs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  pub name: String,
  pub is_admin: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
