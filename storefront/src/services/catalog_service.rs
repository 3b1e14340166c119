// storefront/src/services/catalog_service.rs

//! Catalog access: product lookup, stock decrement, review bookkeeping.

use crate::errors::{AppError, Result};
use crate::models::product::{recompute_ratings, Product, Review};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub async fn find_product(pool: &PgPool, product_id: Uuid) -> Result<Option<Product>> {
  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  Ok(product)
}

pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>> {
  let products: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY name ASC")
    .fetch_all(pool)
    .await?;
  Ok(products)
}

/// Conditionally decrements stock: the row is only touched while enough
/// stock remains, so two concurrent checkouts cannot drive it negative.
/// Returns `false` (zero rows affected) when stock was insufficient at
/// execution time; the caller decides whether that fails its transaction.
pub async fn decrement_stock<'e>(
  executor: impl sqlx::PgExecutor<'e>,
  product_id: Uuid,
  quantity: i32,
) -> Result<bool> {
  let result = sqlx::query(
    "UPDATE products SET stock = stock - $1, updated_at = now() WHERE id = $2 AND stock >= $1",
  )
  .bind(quantity)
  .bind(product_id)
  .execute(executor)
  .await?;
  Ok(result.rows_affected() == 1)
}

/// Appends a review and persists the recomputed ratings/num_reviews pair,
/// keeping the derived fields consistent with the review list.
#[instrument(name = "catalog_service::add_review", skip(pool, review), fields(product_id = %product_id))]
pub async fn add_review(pool: &PgPool, product_id: Uuid, review: Review) -> Result<Product> {
  if !(1..=5).contains(&review.rating) {
    return Err(AppError::Validation("Rating must be between 1 and 5".to_string()));
  }

  let product = find_product(pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", product_id)))?;

  let mut reviews = product.reviews.0.clone();
  reviews.push(review);
  let (ratings, num_reviews) = recompute_ratings(&reviews);

  let updated: Product = sqlx::query_as(
    r#"
    UPDATE products
    SET reviews = $1, ratings = $2, num_reviews = $3, updated_at = now()
    WHERE id = $4
    RETURNING *
    "#,
  )
  .bind(Json(reviews))
  .bind(ratings)
  .bind(num_reviews)
  .bind(product_id)
  .fetch_one(pool)
  .await?;

  info!("Review added to product {}; mean rating now {:.2}", product_id, updated.ratings);
  Ok(updated)
}
