// storefront/src/models/order_item.rs

use crate::models::cart::Customization;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A frozen order line: product name, image and unit price are copied at
/// checkout time so later catalog changes never alter historical orders.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub image: Option<String>,
  pub quantity: i32,
  pub unit_price_cents: i64,
  pub customization: Json<Customization>,
}
