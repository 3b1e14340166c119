// storefront/src/workflows/contexts.rs

//! Underlying data structs carried through the workflows. Handlers receive
//! these wrapped in `conveyor::SharedContext`.

use crate::models::order::{Order, ShippingAddress};
use crate::models::product::Product;
use crate::models::{Cart, Customization};
use crate::pricing::Quote;
use crate::state::AppState;
use uuid::Uuid;

#[derive(Clone)]
pub struct AddToCartCtx {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub customization: Customization,
  // Written by the fetch stage, read by the stock check and upsert stages.
  pub fetched_product: Option<Product>,
  // The resulting cart view, for the HTTP response.
  pub cart: Option<Cart>,
}

#[derive(Clone)]
pub struct PlaceOrderCtx {
  pub app_state: AppState,
  pub user_id: Uuid,
  pub shipping_address: ShippingAddress,
  pub payment_method: String,
  // Written by load_cart_for_order.
  pub cart: Option<Cart>,
  // Written by price_order, from the cart's snapshotted line prices.
  pub quote: Option<Quote>,
  // Written by commit_order.
  pub created_order: Option<Order>,
  pub confirmation_email_sent: bool,
}
