// storefront/src/services/cart_service.rs

//! The server-side cart store. Every operation returns the assembled cart
//! view with product fields joined in and the total recomputed.

use crate::errors::{AppError, Result};
use crate::models::cart::{Cart, CartItem, CartLine, Customization};
use crate::models::product::{Product, ProductImage};
use crate::services::catalog_service;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Row shape of the cart/product join used to assemble the view.
#[derive(Debug, FromRow)]
struct CartJoinRow {
  id: Uuid,
  product_id: Uuid,
  name: String,
  images: Json<Vec<ProductImage>>,
  quantity: i32,
  customization: Json<Customization>,
  price_cents: i64,
  stock: i32,
}

/// Assembles the user's cart. A user with no cart rows simply gets an empty
/// cart; nothing is created eagerly.
pub async fn get_cart(pool: &PgPool, user_id: Uuid) -> Result<Cart> {
  let rows: Vec<CartJoinRow> = sqlx::query_as(
    r#"
    SELECT ci.id, ci.product_id, p.name, p.images, ci.quantity, ci.customization, ci.price_cents, p.stock
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
    WHERE ci.user_id = $1
    ORDER BY ci.added_at ASC
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let lines = rows
    .into_iter()
    .map(|row| CartLine {
      id: row.id,
      product_id: row.product_id,
      name: row.name,
      image: row.images.0.first().map(|img| img.url.clone()),
      quantity: row.quantity,
      customization: row.customization.0,
      price_cents: row.price_cents,
      stock: row.stock,
      line_total_cents: row.price_cents * row.quantity as i64,
    })
    .collect();

  Ok(Cart::from_lines(lines))
}

/// Adds a product to the cart with full validation: the product must exist,
/// the quantity must be at least 1, and current stock must cover it. A line
/// with the same product and deep-equal customization has its quantity
/// incremented atomically; otherwise a new line is inserted with the unit
/// price snapshotted from `discount_price ?? price`.
#[instrument(name = "cart_service::add_item", skip(pool, customization), fields(user_id = %user_id, product_id = %product_id, quantity))]
pub async fn add_item(
  pool: &PgPool,
  user_id: Uuid,
  product_id: Uuid,
  quantity: i32,
  customization: Customization,
) -> Result<Cart> {
  if quantity < 1 {
    warn!("Rejected add to cart with quantity {}", quantity);
    return Err(AppError::Validation("Quantity must be at least 1".to_string()));
  }

  let product = catalog_service::find_product(pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", product_id)))?;

  if product.stock < quantity {
    warn!(
      "Insufficient stock for product {}: available {}, requested {}",
      product_id, product.stock, quantity
    );
    return Err(AppError::InsufficientStock {
      product: product.name.clone(),
      available: product.stock,
      requested: quantity,
    });
  }

  upsert_line(pool, user_id, &product, quantity, &customization).await?;
  get_cart(pool, user_id).await
}

/// The merge-by-identity upsert. The unique index on
/// `(user_id, product_id, customization)` turns "same line" into a conflict,
/// and the increment happens inside the statement, so concurrent adds of the
/// same line cannot lose updates.
pub async fn upsert_line(
  pool: &PgPool,
  user_id: Uuid,
  product: &Product,
  quantity: i32,
  customization: &Customization,
) -> Result<CartItem> {
  let item: CartItem = sqlx::query_as(
    r#"
    INSERT INTO cart_items (user_id, product_id, quantity, customization, price_cents)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (user_id, product_id, customization)
    DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
    RETURNING *
    "#,
  )
  .bind(user_id)
  .bind(product.id)
  .bind(quantity)
  .bind(Json(customization))
  .bind(product.unit_price_cents())
  .fetch_one(pool)
  .await?;

  info!(
    "Cart line {} for user {} now has quantity {}",
    item.id, user_id, item.quantity
  );
  Ok(item)
}

/// Sets a line's quantity. A quantity below 1 is a silent no-op (callers
/// guard the lower bound in the UI); an unknown item id is NotFound.
#[instrument(name = "cart_service::update_item_quantity", skip(pool), fields(user_id = %user_id, item_id = %item_id, quantity))]
pub async fn update_item_quantity(pool: &PgPool, user_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Cart> {
  if quantity < 1 {
    return get_cart(pool, user_id).await;
  }

  let result = sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3")
    .bind(quantity)
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(AppError::NotFound("Item not found in cart".to_string()));
  }

  get_cart(pool, user_id).await
}

/// Removes a line. Removing an absent item id is idempotent, not an error.
#[instrument(name = "cart_service::remove_item", skip(pool), fields(user_id = %user_id, item_id = %item_id))]
pub async fn remove_item(pool: &PgPool, user_id: Uuid, item_id: Uuid) -> Result<Cart> {
  sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
    .bind(item_id)
    .bind(user_id)
    .execute(pool)
    .await?;

  get_cart(pool, user_id).await
}

/// Empties the cart. The cart itself is represented by its rows, so this
/// clears rather than deletes anything else.
#[instrument(name = "cart_service::clear", skip(pool), fields(user_id = %user_id))]
pub async fn clear(pool: &PgPool, user_id: Uuid) -> Result<Cart> {
  sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
    .bind(user_id)
    .execute(pool)
    .await?;

  get_cart(pool, user_id).await
}
