// storefront/src/cart/mod.rs

//! One cart interface, two implementations.
//!
//! Before authentication the client operates a [`LocalCart`] against product
//! snapshots, persisted through a key-value port; after authentication a
//! [`RemoteCart`] delegates to the server-side cart store. Both expose the
//! same operations with the same semantics, so call sites select an
//! implementation by authentication state instead of branching everywhere.
//! [`reconcile`] replays the local cart into the remote one at login.

pub mod local;
pub mod reconcile;
pub mod remote;

pub use local::{FileStore, LocalCart, LocalStore, MemoryStore};
pub use reconcile::{merge_local_cart, MergeReport};
pub use remote::RemoteCart;

use crate::errors::AppError;
use crate::models::product::Product;
use crate::models::{Cart, Customization};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The catalog fields a cart line needs at add time. The local cart stores
/// the whole snapshot (it has no catalog to join against); the remote cart
/// only sends the id and lets the server re-fetch and re-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: Uuid,
  pub name: String,
  pub image: Option<String>,
  pub unit_price_cents: i64,
  pub stock: i32,
}

impl From<&Product> for ProductSnapshot {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      image: product.primary_image(),
      unit_price_cents: product.unit_price_cents(),
      stock: product.stock,
    }
  }
}

/// Cart operations shared by the anonymous (local) and authenticated
/// (remote) implementations. Every mutation returns the resulting cart view
/// with its total recomputed.
#[async_trait]
pub trait CartApi {
  async fn cart(&mut self) -> Result<Cart, AppError>;

  /// Adds `quantity` of a product with the given customization. A line with
  /// the same product and deep-equal customization has its quantity
  /// incremented; otherwise a new line is appended with the unit price
  /// snapshotted from the product.
  async fn add_item(
    &mut self,
    product: &ProductSnapshot,
    quantity: i32,
    customization: Customization,
  ) -> Result<Cart, AppError>;

  /// Sets a line's quantity. A quantity below 1 is ignored (not an error);
  /// an unknown item id is NotFound.
  async fn update_item_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<Cart, AppError>;

  /// Removes a line. Removing an absent item id is not an error.
  async fn remove_item(&mut self, item_id: Uuid) -> Result<Cart, AppError>;

  async fn clear(&mut self) -> Result<Cart, AppError>;
}
