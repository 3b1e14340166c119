// storefront/src/workflows/add_to_cart.rs

use crate::errors::AppError;
use crate::services::{cart_service, catalog_service};
use crate::state::AppState;
use crate::workflows::contexts::AddToCartCtx;
use conveyor::{Conveyor, SharedContext, StageControl, Workflow};
use std::sync::Arc;
use tracing::{info, warn};

pub fn register_add_to_cart_workflow(engine: &Arc<Conveyor<AppError>>, _app_state: &AppState) {
  let mut wf = Workflow::<AddToCartCtx, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("check_product_stock", false, None),
    ("upsert_cart_line", false, None),
  ]);

  // Stage 1: validate the requested quantity.
  wf.on_stage("validate_cart_input", |ctx: SharedContext<AddToCartCtx>| {
    Box::pin(async move {
      let quantity = { ctx.read().quantity };

      if quantity < 1 {
        warn!("Add to cart: invalid quantity ({}) provided.", quantity);
        return Err(AppError::Validation("Quantity must be at least 1".to_string()));
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 2: fetch the product; a missing product fails the whole run.
  wf.on_stage("fetch_product_for_cart", |ctx: SharedContext<AddToCartCtx>| {
    Box::pin(async move {
      let (product_id, db_pool) = {
        let guard = ctx.read();
        (guard.product_id, guard.app_state.db_pool.clone())
      };

      let product = catalog_service::find_product(&db_pool, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", product_id)))?;

      info!(
        "Add to cart: product {} found. Unit price: {}, stock: {}",
        product.id,
        product.unit_price_cents(),
        product.stock
      );
      {
        ctx.write().fetched_product = Some(product);
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 3: check current stock against the requested quantity.
  wf.on_stage("check_product_stock", |ctx: SharedContext<AddToCartCtx>| {
    Box::pin(async move {
      let (requested, product_name, available) = {
        let guard = ctx.read();
        let product = guard
          .fetched_product
          .as_ref()
          .ok_or_else(|| AppError::Internal("Product not loaded before stock check".to_string()))?;
        (guard.quantity, product.name.clone(), product.stock)
      };

      if available < requested {
        warn!(
          "Add to cart: insufficient stock for '{}'. Available: {}, requested: {}.",
          product_name, available, requested
        );
        return Err(AppError::InsufficientStock {
          product: product_name,
          available,
          requested,
        });
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  // Stage 4: merge-or-insert the cart line and assemble the response view.
  wf.on_stage("upsert_cart_line", |ctx: SharedContext<AddToCartCtx>| {
    Box::pin(async move {
      let (db_pool, user_id, quantity, customization, product) = {
        let guard = ctx.read();
        let product = guard
          .fetched_product
          .clone()
          .ok_or_else(|| AppError::Internal("Product not loaded before upsert".to_string()))?;
        (
          guard.app_state.db_pool.clone(),
          guard.user_id,
          guard.quantity,
          guard.customization.clone(),
          product,
        )
      };

      cart_service::upsert_line(&db_pool, user_id, &product, quantity, &customization).await?;
      let cart = cart_service::get_cart(&db_pool, user_id).await?;
      {
        ctx.write().cart = Some(cart);
      }
      Ok::<_, AppError>(StageControl::Continue)
    })
  });

  engine.register_workflow(wf);
  info!("Add-to-cart workflow registered.");
}
