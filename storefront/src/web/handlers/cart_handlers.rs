// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Customization;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::workflows::contexts::AddToCartCtx;
use conveyor::{RunOutcome, SharedContext};

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartPayload {
  pub product_id: Uuid,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
  #[serde(default)]
  pub customization: Customization,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: i32,
}

#[instrument(name = "handler::get_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::get_cart(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  info!(
    "Add to cart attempt by user {}: product {}, quantity {}",
    auth_user.user_id, payload.product_id, payload.quantity
  );

  let ctx = SharedContext::new(AddToCartCtx {
    app_state: app_state.get_ref().clone(),
    user_id: auth_user.user_id,
    product_id: payload.product_id,
    quantity: payload.quantity,
    customization: payload.customization,
    fetched_product: None,
    cart: None,
  });

  match app_state.engine.run(ctx.clone()).await {
    Ok(RunOutcome::Completed) => {
      let cart = {
        let guard = ctx.read();
        guard.cart.clone().ok_or_else(|| {
          warn!("Add-to-cart workflow completed but no cart view was recorded.");
          AppError::Internal("Cart updated, but the result is unavailable.".to_string())
        })?
      };
      Ok(HttpResponse::Created().json(json!({ "cart": cart })))
    }
    Ok(RunOutcome::Halted) => {
      warn!("Add-to-cart workflow for user {} was halted by a handler.", auth_user.user_id);
      Err(AppError::WorkflowHalted)
    }
    Err(app_err) => {
      // Validation / NotFound / InsufficientStock land here and map to
      // their HTTP statuses through ResponseError.
      warn!("Add-to-cart workflow failed for user {}: {:?}", auth_user.user_id, app_err);
      Err(app_err)
    }
  }
}

#[instrument(
    name = "handler::update_cart_item",
    skip(app_state, path, payload, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %path, quantity = %payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateQuantityPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let cart =
    cart_service::update_item_quantity(&app_state.db_pool, auth_user.user_id, item_id, payload.quantity).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}

#[instrument(
    name = "handler::remove_cart_item",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, item_id = %path)
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let item_id = path.into_inner();
  let cart = cart_service::remove_item(&app_state.db_pool, auth_user.user_id, item_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cart = cart_service::clear(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": cart })))
}
