// storefront/src/services/auth_service.rs

//! Collaborator stub for the external identity service.
//!
//! The real deployment issues and validates bearer tokens elsewhere; this
//! stub encodes the user id into the token so the extractor can resolve
//! `currentUser` without a network hop. Token shape:
//! `sess_<user_id_simple>_<nonce>`.

use crate::errors::AppError;
use tracing::debug;
use uuid::Uuid;

pub fn issue_session_token(user_id: Uuid) -> String {
  let token = format!("sess_{}_{}", user_id.simple(), Uuid::new_v4().simple());
  debug!(user_id = %user_id, "Issued session token");
  token
}

pub fn validate_session_token(token: &str) -> Result<Uuid, AppError> {
  let mut parts = token.splitn(3, '_');
  if let (Some("sess"), Some(user_part), Some(_nonce)) = (parts.next(), parts.next(), parts.next()) {
    if let Ok(user_id) = Uuid::parse_str(user_part) {
      debug!(user_id = %user_id, "Session token validated");
      return Ok(user_id);
    }
  }
  Err(AppError::Unauthorized("Invalid or expired session token".to_string()))
}
