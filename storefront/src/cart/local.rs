// storefront/src/cart/local.rs

//! The anonymous client-side cart: identical semantics to the server cart,
//! held in memory and mirrored into a key-value store on every mutation.

use super::{CartApi, ProductSnapshot};
use crate::errors::AppError;
use crate::models::{Cart, CartLine, Customization};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Storage key under which the serialized cart lives, as the browser build
/// kept it under `localStorage["cart"]`.
const CART_STORAGE_KEY: &str = "cart";

/// Key-value persistence port injected into [`LocalCart`]. Implementations
/// must tolerate missing keys.
pub trait LocalStore: Send + Sync {
  fn get(&self, key: &str) -> Option<String>;
  fn put(&mut self, key: &str, value: &str);
  fn remove(&mut self, key: &str);
}

/// In-memory store, used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl LocalStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn put(&mut self, key: &str, value: &str) {
    self.entries.insert(key.to_string(), value.to_string());
  }

  fn remove(&mut self, key: &str) {
    self.entries.remove(key);
  }
}

/// File-backed store: one JSON object per file, keys as fields. Write
/// failures are logged and otherwise ignored, matching the fire-and-forget
/// nature of client-side persistence.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
}

impl FileStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn load_map(&self) -> HashMap<String, String> {
    let Ok(raw) = fs::read_to_string(&self.path) else {
      return HashMap::new();
    };
    serde_json::from_str(&raw).unwrap_or_default()
  }

  fn store_map(&self, map: &HashMap<String, String>) {
    match serde_json::to_string(map) {
      Ok(raw) => {
        if let Err(e) = fs::write(&self.path, raw) {
          tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist local store");
        }
      }
      Err(e) => tracing::warn!(error = %e, "Failed to serialize local store"),
    }
  }
}

impl LocalStore for FileStore {
  fn get(&self, key: &str) -> Option<String> {
    self.load_map().get(key).cloned()
  }

  fn put(&mut self, key: &str, value: &str) {
    let mut map = self.load_map();
    map.insert(key.to_string(), value.to_string());
    self.store_map(&map);
  }

  fn remove(&mut self, key: &str) {
    let mut map = self.load_map();
    map.remove(key);
    self.store_map(&map);
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalCartLine {
  pub id: Uuid,
  pub product: ProductSnapshot,
  pub quantity: i32,
  pub customization: Customization,
  /// Unit price snapshot taken when the line was first added.
  pub price_cents: i64,
}

/// The anonymous cart. Loaded from the store on construction, saved back on
/// every mutation.
pub struct LocalCart {
  items: Vec<LocalCartLine>,
  store: Box<dyn LocalStore>,
}

impl LocalCart {
  pub fn load(store: Box<dyn LocalStore>) -> Self {
    let items = store
      .get(CART_STORAGE_KEY)
      .and_then(|raw| serde_json::from_str(&raw).ok())
      .unwrap_or_default();
    Self { items, store }
  }

  pub fn lines(&self) -> &[LocalCartLine] {
    &self.items
  }

  fn persist(&mut self) {
    match serde_json::to_string(&self.items) {
      Ok(raw) => self.store.put(CART_STORAGE_KEY, &raw),
      Err(e) => tracing::warn!(error = %e, "Failed to serialize local cart"),
    }
  }

  fn view(&self) -> Cart {
    let lines = self
      .items
      .iter()
      .map(|item| CartLine {
        id: item.id,
        product_id: item.product.id,
        name: item.product.name.clone(),
        image: item.product.image.clone(),
        quantity: item.quantity,
        customization: item.customization.clone(),
        price_cents: item.price_cents,
        stock: item.product.stock,
        line_total_cents: item.price_cents * item.quantity as i64,
      })
      .collect();
    Cart::from_lines(lines)
  }
}

#[async_trait]
impl CartApi for LocalCart {
  async fn cart(&mut self) -> Result<Cart, AppError> {
    Ok(self.view())
  }

  async fn add_item(
    &mut self,
    product: &ProductSnapshot,
    quantity: i32,
    customization: Customization,
  ) -> Result<Cart, AppError> {
    if quantity < 1 {
      return Err(AppError::Validation("Quantity must be at least 1".to_string()));
    }
    if product.stock < quantity {
      return Err(AppError::InsufficientStock {
        product: product.name.clone(),
        available: product.stock,
        requested: quantity,
      });
    }

    match self
      .items
      .iter_mut()
      .find(|item| item.product.id == product.id && item.customization == customization)
    {
      Some(existing) => existing.quantity += quantity,
      None => self.items.push(LocalCartLine {
        id: Uuid::new_v4(),
        product: product.clone(),
        quantity,
        customization,
        price_cents: product.unit_price_cents,
      }),
    }

    self.persist();
    Ok(self.view())
  }

  async fn update_item_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<Cart, AppError> {
    if quantity < 1 {
      // Contract: ignored, not an error. The UI guards the lower bound.
      return Ok(self.view());
    }
    let item = self
      .items
      .iter_mut()
      .find(|item| item.id == item_id)
      .ok_or_else(|| AppError::NotFound("Item not found in cart".to_string()))?;
    item.quantity = quantity;

    self.persist();
    Ok(self.view())
  }

  async fn remove_item(&mut self, item_id: Uuid) -> Result<Cart, AppError> {
    self.items.retain(|item| item.id != item_id);
    self.persist();
    Ok(self.view())
  }

  async fn clear(&mut self) -> Result<Cart, AppError> {
    self.items.clear();
    self.store.remove(CART_STORAGE_KEY);
    Ok(self.view())
  }
}
