// storefront/src/models/order.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Placed,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  /// The validated transition table:
  ///
  /// placed -> processing | cancelled
  /// processing -> shipped | cancelled
  /// shipped -> delivered
  ///
  /// `delivered` and `cancelled` are terminal.
  pub fn can_transition_to(self, next: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
      (self, next),
      (Placed, Processing)
        | (Placed, Cancelled)
        | (Processing, Shipped)
        | (Processing, Cancelled)
        | (Shipped, Delivered)
    )
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      OrderStatus::Placed => "placed",
      OrderStatus::Processing => "processing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    };
    f.write_str(s)
  }
}

/// One entry of the append-only status log carried on every order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
  pub status: OrderStatus,
  pub at: DateTime<Utc>,
  #[serde(default)]
  pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
  pub full_name: String,
  pub address: String,
  pub city: String,
  pub postal_code: String,
  pub country: String,
}

impl ShippingAddress {
  pub fn validate(&self) -> Result<(), AppError> {
    let fields = [
      ("fullName", &self.full_name),
      ("address", &self.address),
      ("city", &self.city),
      ("postalCode", &self.postal_code),
      ("country", &self.country),
    ];
    for (name, value) in fields {
      if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Shipping address field '{}' is required", name)));
      }
    }
    Ok(())
  }
}

/// An order is created once at checkout and is immutable afterwards except
/// for its status/payment/delivery fields. Its line items live in
/// `order_items` as a frozen copy decoupled from the live catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub shipping_address: Json<ShippingAddress>,
  pub payment_method: String,
  pub items_price_cents: i64,
  pub tax_price_cents: i64,
  pub shipping_price_cents: i64,
  pub total_price_cents: i64,
  pub is_paid: bool,
  pub paid_at: Option<DateTime<Utc>>,
  pub is_delivered: bool,
  pub delivered_at: Option<DateTime<Utc>>,
  pub status_history: Json<Vec<StatusEntry>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
