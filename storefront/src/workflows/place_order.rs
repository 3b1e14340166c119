// storefront/src/workflows/place_order.rs

//! The order-placement workflow: validate input, load the cart, re-verify
//! stock, price from the snapshotted line prices, then commit order +
//! stock decrement + cart clear as one unit of work.

use crate::errors::AppError;
use crate::models::order::{Order, OrderStatus, StatusEntry};
use crate::services::{catalog_service, email_mock, user_service};
use crate::state::AppState;
use crate::workflows::contexts::PlaceOrderCtx;
use chrono::Utc;
use conveyor::{Conveyor, SharedContext, StageControl, Workflow};
use sqlx::types::Json;
use std::sync::Arc;
use tracing::{info, warn};

pub fn register_place_order_workflow(engine: &Arc<Conveyor<AppError>>, _app_state: &AppState) {
  let mut wf = Workflow::<PlaceOrderCtx, AppError>::new(&[
    ("validate_order_input", false, None),
    ("load_cart_for_order", false, None),
    ("verify_stock_levels", false, None),
    ("price_order", false, None),
    ("commit_order", false, None),
    ("send_order_confirmation", true, None), // Optional: failures never fail the order
  ]);

  // Stage 1: shipping address and payment method must be usable.
  wf.on_stage("validate_order_input", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      {
        let guard = ctx.read();
        guard.shipping_address.validate()?;
        if guard.payment_method.trim().is_empty() {
          return Err(AppError::Validation("Payment method is required".to_string()));
        }
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 2: load the cart; an empty cart cannot become an order.
  wf.on_stage("load_cart_for_order", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      let (db_pool, user_id) = {
        let guard = ctx.read();
        (guard.app_state.db_pool.clone(), guard.user_id)
      };

      let cart = crate::services::cart_service::get_cart(&db_pool, user_id).await?;
      if cart.is_empty() {
        return Err(AppError::EmptyCart);
      }

      info!("Place order: cart loaded with {} lines for user {}", cart.items.len(), user_id);
      {
        ctx.write().cart = Some(cart);
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 3: re-fetch every product and re-check stock. Guards against
  // drift between add-to-cart time and checkout time.
  wf.on_stage("verify_stock_levels", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      let (db_pool, cart) = {
        let guard = ctx.read();
        let cart = guard
          .cart
          .clone()
          .ok_or_else(|| AppError::Internal("Cart not loaded before stock verification".to_string()))?;
        (guard.app_state.db_pool.clone(), cart)
      };

      for line in &cart.items {
        let product = catalog_service::find_product(&db_pool, line.product_id)
          .await?
          .ok_or_else(|| AppError::NotFound(format!("Product '{}' is no longer available", line.name)))?;
        if product.stock < line.quantity {
          warn!(
            "Place order: insufficient stock for '{}'. Available: {}, requested: {}.",
            product.name, product.stock, line.quantity
          );
          return Err(AppError::InsufficientStock {
            product: product.name,
            available: product.stock,
            requested: line.quantity,
          });
        }
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 4: price from the snapshotted line prices, NOT live product
  // prices, so catalog changes between cart-add and checkout never alter
  // the charged amount. Cart::quote is the same call the display path uses.
  wf.on_stage("price_order", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      let quote = {
        let guard = ctx.read();
        let cart = guard
          .cart
          .as_ref()
          .ok_or_else(|| AppError::Internal("Cart not loaded before pricing".to_string()))?;
        cart.quote()
      };

      info!(
        "Place order: priced at items {} + tax {} + shipping {} = {}",
        quote.items_cents, quote.tax_cents, quote.shipping_cents, quote.total_cents
      );
      {
        ctx.write().quote = Some(quote);
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 5: the unit of work. Order insert, frozen lines, conditional
  // stock decrements and cart clear all ride one transaction: either the
  // whole order commits or nothing does. A decrement touching zero rows
  // means stock moved since the verify stage; that rolls back and surfaces
  // as recoverable InsufficientStock. Failures after the order insert are
  // Fatal: they carry the order id and the stage reached for the operator.
  wf.on_stage("commit_order", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      let (db_pool, user_id, cart, quote, shipping_address, payment_method) = {
        let guard = ctx.read();
        let cart = guard
          .cart
          .clone()
          .ok_or_else(|| AppError::Internal("Cart not loaded before commit".to_string()))?;
        let quote = guard
          .quote
          .ok_or_else(|| AppError::Internal("Order not priced before commit".to_string()))?;
        (
          guard.app_state.db_pool.clone(),
          guard.user_id,
          cart,
          quote,
          guard.shipping_address.clone(),
          guard.payment_method.clone(),
        )
      };

      let mut tx = db_pool.begin().await?;

      let initial_history = vec![StatusEntry {
        status: OrderStatus::Placed,
        at: Utc::now(),
        note: Some("order placed".to_string()),
      }];

      let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders
          (user_id, status, shipping_address, payment_method,
           items_price_cents, tax_price_cents, shipping_price_cents, total_price_cents,
           status_history)
        VALUES ($1, 'placed', $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
      )
      .bind(user_id)
      .bind(Json(&shipping_address))
      .bind(&payment_method)
      .bind(quote.items_cents)
      .bind(quote.tax_cents)
      .bind(quote.shipping_cents)
      .bind(quote.total_cents)
      .bind(Json(&initial_history))
      .fetch_one(&mut *tx)
      .await?;

      for line in &cart.items {
        sqlx::query(
          r#"
          INSERT INTO order_items (order_id, product_id, name, image, quantity, unit_price_cents, customization)
          VALUES ($1, $2, $3, $4, $5, $6, $7)
          "#,
        )
        .bind(order.id)
        .bind(line.product_id)
        .bind(&line.name)
        .bind(&line.image)
        .bind(line.quantity)
        .bind(line.price_cents)
        .bind(Json(&line.customization))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Fatal {
          order_id: Some(order.id),
          stage: "persist_order_items".to_string(),
          detail: format!("product {}: {}", line.product_id, e),
        })?;
      }

      for line in &cart.items {
        let decremented = catalog_service::decrement_stock(&mut *tx, line.product_id, line.quantity)
          .await
          .map_err(|e| AppError::Fatal {
            order_id: Some(order.id),
            stage: "decrement_stock".to_string(),
            detail: format!("product {}: {}", line.product_id, e),
          })?;

        if !decremented {
          // Stock moved between the verify stage and here. Roll everything
          // back and report it like any other stock shortage.
          tx.rollback().await.map_err(|e| AppError::Fatal {
            order_id: Some(order.id),
            stage: "decrement_stock_rollback".to_string(),
            detail: e.to_string(),
          })?;
          let available = catalog_service::find_product(&db_pool, line.product_id)
            .await
            .ok()
            .flatten()
            .map(|p| p.stock)
            .unwrap_or(0);
          return Err(AppError::InsufficientStock {
            product: line.name.clone(),
            available,
            requested: line.quantity,
          });
        }
      }

      sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Fatal {
          order_id: Some(order.id),
          stage: "clear_cart".to_string(),
          detail: e.to_string(),
        })?;

      tx.commit().await.map_err(|e| AppError::Fatal {
        order_id: Some(order.id),
        stage: "commit".to_string(),
        detail: e.to_string(),
      })?;

      info!("Place order: order {} committed for user {}", order.id, user_id);
      {
        ctx.write().created_order = Some(order);
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 6 (optional): confirmation email. Send failures are logged and
  // swallowed; they must never fail the placed order.
  wf.on_stage("send_order_confirmation", |ctx: SharedContext<PlaceOrderCtx>| {
    Box::pin(async move {
      let (db_pool, user_id, order, sender) = {
        let guard = ctx.read();
        let Some(order) = guard.created_order.clone() else {
          warn!("Skipping confirmation email: no order recorded on context.");
          return Ok::<_, AppError>(StageControl::Continue);
        };
        (
          guard.app_state.db_pool.clone(),
          guard.user_id,
          order,
          guard.app_state.config.email_sender.clone(),
        )
      };

      let customer = match user_service::find_user(&db_pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
          warn!("Skipping confirmation email for order {}: user {} not found.", order.id, user_id);
          return Ok(StageControl::Continue);
        }
        Err(e) => {
          warn!("Skipping confirmation email for order {}: {}", order.id, e);
          return Ok(StageControl::Continue);
        }
      };

      let total_display = format!("{:.2}", order.total_price_cents as f64 / 100.0);
      match email_mock::send_mock_email(
        &customer.email,
        &sender,
        &format!("Your order {} is confirmed", order.id),
        &format!(
          "<p>Hi {},</p><p>Your order {} for {} has been placed.</p><p>Thank you for your purchase!</p>",
          customer.name, order.id, total_display
        ),
      )
      .await
      {
        Ok(sent) => {
          info!("Order confirmation email sent for order {}. Message ID: {}", order.id, sent.message_id);
          ctx.write().confirmation_email_sent = true;
        }
        Err(e) => {
          warn!("Failed to send confirmation email for order {}: {:?}", order.id, e);
          ctx.write().confirmation_email_sent = false;
        }
      }
      Ok(StageControl::Continue)
    })
  });

  engine.register_workflow(wf);
  info!("Place-order workflow registered.");
}
