// storefront/src/web/auth.rs

//! Request extractor resolving the current user from the bearer token
//! issued by the identity collaborator.

use crate::errors::AppError;
use crate::services::auth_service;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
      if let Ok(raw) = value.to_str() {
        if let Some(token) = raw.strip_prefix("Bearer ") {
          return futures_util::future::ready(
            auth_service::validate_session_token(token.trim()).map(|user_id| AuthenticatedUser { user_id }),
          );
        }
      }
    }

    warn!("AuthenticatedUser extractor: missing or malformed Authorization header.");
    futures_util::future::ready(Err(AppError::Unauthorized(
      "Authentication required. Provide a bearer token.".to_string(),
    )))
  }
}
