// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::product::Review;
use crate::services::{catalog_service, user_service};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct AddReviewPayload {
  pub rating: i32,
  #[serde(default)]
  pub comment: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = catalog_service::list_products(&app_state.db_pool).await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = catalog_service::find_product(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", product_id)))?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(
    name = "handler::add_review",
    skip(app_state, path, payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %path, rating = %payload.rating)
)]
pub async fn add_review_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<AddReviewPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let user = user_service::require_user(&app_state.db_pool, auth_user.user_id).await?;

  let review = Review {
    user_id: user.id,
    name: user.name,
    rating: payload.rating,
    comment: payload.comment.clone(),
    created_at: Utc::now(),
  };

  let product = catalog_service::add_review(&app_state.db_pool, product_id, review).await?;
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}
