// storefront/src/services/order_service.rs

//! Order queries and administrative status transitions. Order creation
//! itself runs as the place-order workflow.

use crate::errors::{AppError, Result};
use crate::models::order::{Order, OrderStatus, StatusEntry};
use crate::models::order_item::OrderItem;
use crate::models::user::User;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub async fn find_order(pool: &PgPool, order_id: Uuid) -> Result<Option<Order>> {
  let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
  Ok(order)
}

/// Fetches an order visible to the given user: the owner, or any admin.
/// A foreign order is reported as NotFound rather than Forbidden so its
/// existence is not leaked.
pub async fn find_order_for_user(pool: &PgPool, user: &User, order_id: Uuid) -> Result<Order> {
  let order = find_order(pool, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

  if order.user_id != user.id && !user.is_admin {
    return Err(AppError::NotFound("Order not found".to_string()));
  }
  Ok(order)
}

pub async fn list_user_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>> {
  let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
    .bind(user_id)
    .fetch_all(pool)
    .await?;
  Ok(orders)
}

pub async fn list_order_items(pool: &PgPool, order_id: Uuid) -> Result<Vec<OrderItem>> {
  let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1")
    .bind(order_id)
    .fetch_all(pool)
    .await?;
  Ok(items)
}

/// Validates the move against the transition table and returns the history
/// with the new entry appended.
fn validated_history(order: &Order, next: OrderStatus, note: Option<String>) -> Result<Vec<StatusEntry>> {
  if !order.status.can_transition_to(next) {
    return Err(AppError::Validation(format!(
      "Cannot move order from '{}' to '{}'",
      order.status, next
    )));
  }
  let mut history = order.status_history.0.clone();
  history.push(StatusEntry {
    status: next,
    at: Utc::now(),
    note,
  });
  Ok(history)
}

/// Marks an order paid: sets the payment fields and moves it to
/// `processing`. Only valid from `placed`.
#[instrument(name = "order_service::mark_paid", skip(pool), fields(order_id = %order_id))]
pub async fn mark_paid(pool: &PgPool, order_id: Uuid) -> Result<Order> {
  let order = find_order(pool, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  let history = validated_history(&order, OrderStatus::Processing, Some("payment received".to_string()))?;

  // The status guard makes the read-validate-update optimistic: a
  // concurrent transition leaves zero rows and the caller retries.
  let updated: Option<Order> = sqlx::query_as(
    r#"
    UPDATE orders
    SET status = $1, status_history = $2, is_paid = TRUE, paid_at = now(), updated_at = now()
    WHERE id = $3 AND status = $4
    RETURNING *
    "#,
  )
  .bind(OrderStatus::Processing)
  .bind(Json(history))
  .bind(order_id)
  .bind(order.status)
  .fetch_optional(pool)
  .await?;

  let updated = updated.ok_or_else(|| {
    AppError::Validation("Order status changed concurrently; please retry".to_string())
  })?;
  info!("Order {} marked paid", order_id);
  Ok(updated)
}

/// Marks an order delivered. Only valid from `shipped`.
#[instrument(name = "order_service::mark_delivered", skip(pool), fields(order_id = %order_id))]
pub async fn mark_delivered(pool: &PgPool, order_id: Uuid) -> Result<Order> {
  let order = find_order(pool, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  let history = validated_history(&order, OrderStatus::Delivered, None)?;

  let updated: Option<Order> = sqlx::query_as(
    r#"
    UPDATE orders
    SET status = $1, status_history = $2, is_delivered = TRUE, delivered_at = now(), updated_at = now()
    WHERE id = $3 AND status = $4
    RETURNING *
    "#,
  )
  .bind(OrderStatus::Delivered)
  .bind(Json(history))
  .bind(order_id)
  .bind(order.status)
  .fetch_optional(pool)
  .await?;

  let updated = updated.ok_or_else(|| {
    AppError::Validation("Order status changed concurrently; please retry".to_string())
  })?;
  info!("Order {} marked delivered", order_id);
  Ok(updated)
}

/// Administrative transition to an arbitrary status, still constrained by
/// the transition table. Moving to `delivered` also sets the delivery
/// fields.
#[instrument(name = "order_service::set_status", skip(pool, note), fields(order_id = %order_id, next = %next))]
pub async fn set_status(pool: &PgPool, order_id: Uuid, next: OrderStatus, note: Option<String>) -> Result<Order> {
  let order = find_order(pool, order_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
  let history = validated_history(&order, next, note)?;

  let updated: Option<Order> = sqlx::query_as(
    r#"
    UPDATE orders
    SET status = $1,
        status_history = $2,
        is_delivered = CASE WHEN $1 = 'delivered'::order_status THEN TRUE ELSE is_delivered END,
        delivered_at = CASE WHEN $1 = 'delivered'::order_status THEN now() ELSE delivered_at END,
        updated_at = now()
    WHERE id = $3 AND status = $4
    RETURNING *
    "#,
  )
  .bind(next)
  .bind(Json(history))
  .bind(order_id)
  .bind(order.status)
  .fetch_optional(pool)
  .await?;

  let updated = updated.ok_or_else(|| {
    AppError::Validation("Order status changed concurrently; please retry".to_string())
  })?;
  info!("Order {} moved to status '{}'", order_id, next);
  Ok(updated)
}
