// storefront/src/models/cart.rs

use crate::pricing::{self, ChargeLine, Quote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Option name -> chosen value, e.g. `{"paper": "matte"}`.
///
/// A BTreeMap keeps keys sorted, so deep equality of two customizations is
/// independent of insertion order — the canonical form used for line
/// identity. The JSONB column stores objects with sorted unique keys, so the
/// database sees the same canonical form.
pub type Customization = BTreeMap<String, String>;

/// One persisted cart row. The `(user_id, product_id, customization)` triple
/// is unique: adding the same product with the same customization increments
/// `quantity` instead of inserting a second row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub customization: Json<Customization>,
  /// Unit price snapshot taken when the line was first added.
  pub price_cents: i64,
  pub added_at: DateTime<Utc>,
}

/// One line of the assembled cart view, with catalog fields joined in for
/// display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
  pub id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub image: Option<String>,
  pub quantity: i32,
  pub customization: Customization,
  pub price_cents: i64,
  pub stock: i32,
  pub line_total_cents: i64,
}

/// The cart view returned by every cart operation. `total_price_cents` is
/// recomputed from the lines on every assembly, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
  pub items: Vec<CartLine>,
  pub total_price_cents: i64,
}

impl Cart {
  pub fn from_lines(items: Vec<CartLine>) -> Self {
    let total_price_cents = items.iter().map(|line| line.line_total_cents).sum();
    Self { items, total_price_cents }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Prices this cart from its snapshotted line prices. The pre-checkout
  /// display and the order commit both go through here, so the two can
  /// never disagree.
  pub fn quote(&self) -> Quote {
    let lines: Vec<ChargeLine> = self
      .items
      .iter()
      .map(|line| ChargeLine {
        unit_price_cents: line.price_cents,
        quantity: line.quantity,
      })
      .collect();
    pricing::quote(&lines)
  }
}
