// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
  pub url: String,
  #[serde(default)]
  pub alt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub user_id: Uuid,
  pub name: String,
  pub rating: i32, // 1..=5
  #[serde(default)]
  pub comment: Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationOption {
  pub name: String,
  pub options: Vec<String>,
  #[serde(default)]
  pub required: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub discount_price_cents: Option<i64>, // When set, must be <= price_cents
  pub stock: i32,
  pub images: Json<Vec<ProductImage>>,
  // Derived from `reviews`; recomputed on every review mutation.
  pub ratings: f64,
  pub num_reviews: i32,
  pub reviews: Json<Vec<Review>>,
  pub featured: bool,
  pub customization_options: Json<Vec<CustomizationOption>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Unit price snapshotted onto new cart lines: the discount price when one
  /// is set, the list price otherwise.
  pub fn unit_price_cents(&self) -> i64 {
    self.discount_price_cents.unwrap_or(self.price_cents)
  }

  /// First image URL, used on frozen order lines.
  pub fn primary_image(&self) -> Option<String> {
    self.images.0.first().map(|img| img.url.clone())
  }
}

/// Mean review rating and review count; (0.0, 0) when there are no reviews.
pub fn recompute_ratings(reviews: &[Review]) -> (f64, i32) {
  if reviews.is_empty() {
    return (0.0, 0);
  }
  let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
  (sum as f64 / reviews.len() as f64, reviews.len() as i32)
}
