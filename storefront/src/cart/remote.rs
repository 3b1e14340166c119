// storefront/src/cart/remote.rs

//! The authenticated cart: same interface as [`LocalCart`](super::LocalCart),
//! delegating every operation to the server-side cart store.

use super::{CartApi, ProductSnapshot};
use crate::errors::AppError;
use crate::models::{Cart, Customization};
use crate::services::cart_service;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct RemoteCart {
  pool: PgPool,
  user_id: Uuid,
}

impl RemoteCart {
  pub fn new(pool: PgPool, user_id: Uuid) -> Self {
    Self { pool, user_id }
  }
}

#[async_trait]
impl CartApi for RemoteCart {
  async fn cart(&mut self) -> Result<Cart, AppError> {
    cart_service::get_cart(&self.pool, self.user_id).await
  }

  async fn add_item(
    &mut self,
    product: &ProductSnapshot,
    quantity: i32,
    customization: Customization,
  ) -> Result<Cart, AppError> {
    // Only the id travels; the server re-fetches the product and applies
    // its own stock and price-snapshot rules.
    cart_service::add_item(&self.pool, self.user_id, product.id, quantity, customization).await
  }

  async fn update_item_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<Cart, AppError> {
    cart_service::update_item_quantity(&self.pool, self.user_id, item_id, quantity).await
  }

  async fn remove_item(&mut self, item_id: Uuid) -> Result<Cart, AppError> {
    cart_service::remove_item(&self.pool, self.user_id, item_id).await
  }

  async fn clear(&mut self) -> Result<Cart, AppError> {
    cart_service::clear(&self.pool, self.user_id).await
  }
}
