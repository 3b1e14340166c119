// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::order::{OrderStatus, ShippingAddress};
use crate::models::user::User;
use crate::services::{order_service, user_service};
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::workflows::contexts::PlaceOrderCtx;
use conveyor::{RunOutcome, SharedContext};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
  pub shipping_address: ShippingAddress,
  pub payment_method: String,
}

#[derive(Deserialize, Debug)]
pub struct SetStatusPayload {
  pub status: OrderStatus,
  #[serde(default)]
  pub note: Option<String>,
}

async fn require_admin(app_state: &AppState, auth_user: &AuthenticatedUser) -> Result<User, AppError> {
  let user = user_service::require_user(&app_state.db_pool, auth_user.user_id).await?;
  if !user.is_admin {
    return Err(AppError::Unauthorized("Admin access required".to_string()));
  }
  Ok(user)
}

#[instrument(
    name = "handler::create_order",
    skip(app_state, payload, auth_user),
    fields(user_id = %auth_user.user_id, payment_method = %payload.payment_method)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  info!("Checkout attempt by user {}", auth_user.user_id);

  let ctx = SharedContext::new(PlaceOrderCtx {
    app_state: app_state.get_ref().clone(),
    user_id: auth_user.user_id,
    shipping_address: payload.shipping_address,
    payment_method: payload.payment_method,
    cart: None,
    quote: None,
    created_order: None,
    confirmation_email_sent: false,
  });

  match app_state.engine.run(ctx.clone()).await {
    Ok(RunOutcome::Completed) => {
      let order = {
        let guard = ctx.read();
        guard.created_order.clone().ok_or_else(|| {
          warn!("Place-order workflow completed but no order was recorded.");
          AppError::Internal("Order placed, but the result is unavailable.".to_string())
        })?
      };
      let items = order_service::list_order_items(&app_state.db_pool, order.id).await?;
      info!("Order {} placed by user {}", order.id, auth_user.user_id);
      Ok(HttpResponse::Created().json(json!({ "order": order, "items": items })))
    }
    Ok(RunOutcome::Halted) => {
      warn!("Place-order workflow for user {} was halted by a handler.", auth_user.user_id);
      Err(AppError::WorkflowHalted)
    }
    Err(app_err) => {
      warn!("Place-order workflow failed for user {}: {:?}", auth_user.user_id, app_err);
      Err(app_err)
    }
  }
}

#[instrument(name = "handler::get_my_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = order_service::list_user_orders(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path)
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let user = user_service::require_user(&app_state.db_pool, auth_user.user_id).await?;
  let order = order_service::find_order_for_user(&app_state.db_pool, &user, order_id).await?;
  let items = order_service::list_order_items(&app_state.db_pool, order.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order, "items": items })))
}

#[instrument(
    name = "handler::mark_order_paid",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path)
)]
pub async fn mark_paid_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let order = order_service::mark_paid(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[instrument(
    name = "handler::mark_order_delivered",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path)
)]
pub async fn mark_delivered_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let order = order_service::mark_delivered(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[instrument(
    name = "handler::set_order_status",
    skip(app_state, path, payload, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path)
)]
pub async fn set_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<SetStatusPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  require_admin(&app_state, &auth_user).await?;
  let payload = payload.into_inner();
  let order = order_service::set_status(&app_state.db_pool, path.into_inner(), payload.status, payload.note).await?;
  Ok(HttpResponse::Ok().json(json!({ "order": order })))
}
