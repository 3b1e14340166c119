// storefront/src/cart/reconcile.rs

//! One-time merge of the anonymous cart into the authenticated user's
//! server-side cart, run at the moment a client logs in or registers.
//!
//! The merge is best-effort, not transactional: each local line is replayed
//! through the remote `add_item`, so the server's merge rules apply and
//! quantities add onto any existing server-side lines. A line that fails
//! (say, stock ran out while the visitor was anonymous) is logged and
//! skipped; the login flow is never aborted. Afterwards the local cart is
//! discarded and the server cart becomes authoritative.

use super::local::LocalCart;
use super::CartApi;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct MergeReport {
  pub merged: usize,
  /// (product name, reason) for every line that could not be replayed.
  pub skipped: Vec<(String, String)>,
}

pub async fn merge_local_cart<R>(local: &mut LocalCart, remote: &mut R) -> MergeReport
where
  R: CartApi + Send,
{
  let mut report = MergeReport::default();

  let lines: Vec<_> = local.lines().to_vec();
  if lines.is_empty() {
    return report;
  }

  for line in lines {
    match remote.add_item(&line.product, line.quantity, line.customization.clone()).await {
      Ok(_) => report.merged += 1,
      Err(e) => {
        warn!(
          product = %line.product.name,
          quantity = line.quantity,
          error = %e,
          "Skipping cart line during reconciliation"
        );
        report.skipped.push((line.product.name.clone(), e.to_string()));
      }
    }
  }

  // The server cart is authoritative from here on, even if some lines were
  // skipped.
  if let Err(e) = local.clear().await {
    warn!(error = %e, "Failed to clear local cart after reconciliation");
  }

  info!(merged = report.merged, skipped = report.skipped.len(), "Cart reconciliation finished");
  report
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cart::local::MemoryStore;
  use crate::cart::{CartApi, ProductSnapshot};
  use crate::errors::AppError;
  use crate::models::{Cart, CartLine, Customization};
  use async_trait::async_trait;
  use std::collections::HashMap;
  use uuid::Uuid;

  /// Server-side double with the real merge rules: dedupe by
  /// (product, customization), stock enforced per add.
  #[derive(Default)]
  struct FakeRemote {
    stock: HashMap<Uuid, i32>,
    lines: Vec<(Uuid, Customization, i32, i64, Uuid)>, // product, customization, qty, price, line id
  }

  impl FakeRemote {
    fn with_stock(stock: &[(Uuid, i32)]) -> Self {
      Self {
        stock: stock.iter().copied().collect(),
        lines: Vec::new(),
      }
    }

    fn view(&self) -> Cart {
      let items = self
        .lines
        .iter()
        .map(|(product_id, customization, quantity, price_cents, id)| CartLine {
          id: *id,
          product_id: *product_id,
          name: String::new(),
          image: None,
          quantity: *quantity,
          customization: customization.clone(),
          price_cents: *price_cents,
          stock: self.stock.get(product_id).copied().unwrap_or(0),
          line_total_cents: price_cents * *quantity as i64,
        })
        .collect();
      Cart::from_lines(items)
    }
  }

  #[async_trait]
  impl CartApi for FakeRemote {
    async fn cart(&mut self) -> Result<Cart, AppError> {
      Ok(self.view())
    }

    async fn add_item(
      &mut self,
      product: &ProductSnapshot,
      quantity: i32,
      customization: Customization,
    ) -> Result<Cart, AppError> {
      let available = self.stock.get(&product.id).copied().unwrap_or(0);
      if available < quantity {
        return Err(AppError::InsufficientStock {
          product: product.name.clone(),
          available,
          requested: quantity,
        });
      }
      match self
        .lines
        .iter_mut()
        .find(|(id, c, ..)| *id == product.id && *c == customization)
      {
        Some((.., qty, _, _)) => *qty += quantity,
        None => self
          .lines
          .push((product.id, customization, quantity, product.unit_price_cents, Uuid::new_v4())),
      }
      Ok(self.view())
    }

    async fn update_item_quantity(&mut self, _item_id: Uuid, _quantity: i32) -> Result<Cart, AppError> {
      unimplemented!("not exercised by reconciliation")
    }

    async fn remove_item(&mut self, _item_id: Uuid) -> Result<Cart, AppError> {
      unimplemented!("not exercised by reconciliation")
    }

    async fn clear(&mut self) -> Result<Cart, AppError> {
      self.lines.clear();
      Ok(self.view())
    }
  }

  fn snapshot(id: Uuid, name: &str, unit_price_cents: i64, stock: i32) -> ProductSnapshot {
    ProductSnapshot {
      id,
      name: name.to_string(),
      image: None,
      unit_price_cents,
      stock,
    }
  }

  #[tokio::test]
  async fn merge_into_empty_server_cart_copies_all_lines() {
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();

    let mut local = LocalCart::load(Box::new(MemoryStore::new()));
    local.add_item(&snapshot(p1, "P1", 500, 10), 1, Customization::new()).await.unwrap();
    local.add_item(&snapshot(p2, "P2", 300, 10), 2, Customization::new()).await.unwrap();

    let mut remote = FakeRemote::with_stock(&[(p1, 10), (p2, 10)]);
    let report = merge_local_cart(&mut local, &mut remote).await;

    assert_eq!(report.merged, 2);
    assert!(report.skipped.is_empty());

    let server = remote.cart().await.unwrap();
    assert_eq!(server.items.len(), 2);
    assert_eq!(server.total_price_cents, 500 + 2 * 300);

    // Local side is discarded once the server cart is authoritative.
    assert!(local.lines().is_empty());
  }

  #[tokio::test]
  async fn merge_adds_quantities_onto_existing_server_lines() {
    let p1 = Uuid::new_v4();
    let snap = snapshot(p1, "P1", 500, 10);

    let mut remote = FakeRemote::with_stock(&[(p1, 10)]);
    remote.add_item(&snap, 1, Customization::new()).await.unwrap();

    let mut local = LocalCart::load(Box::new(MemoryStore::new()));
    local.add_item(&snap, 1, Customization::new()).await.unwrap();

    let report = merge_local_cart(&mut local, &mut remote).await;
    assert_eq!(report.merged, 1);

    let server = remote.cart().await.unwrap();
    assert_eq!(server.items.len(), 1);
    assert_eq!(server.items[0].quantity, 2);
  }

  #[tokio::test]
  async fn failed_line_is_skipped_and_merge_continues() {
    let sold_out = Uuid::new_v4();
    let in_stock = Uuid::new_v4();

    let mut local = LocalCart::load(Box::new(MemoryStore::new()));
    // Stock looked fine when the visitor added it...
    local
      .add_item(&snapshot(sold_out, "Sold Out", 900, 5), 3, Customization::new())
      .await
      .unwrap();
    local
      .add_item(&snapshot(in_stock, "Available", 400, 5), 1, Customization::new())
      .await
      .unwrap();

    // ...but the server has none left by login time.
    let mut remote = FakeRemote::with_stock(&[(sold_out, 0), (in_stock, 5)]);
    let report = merge_local_cart(&mut local, &mut remote).await;

    assert_eq!(report.merged, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "Sold Out");

    let server = remote.cart().await.unwrap();
    assert_eq!(server.items.len(), 1);
    assert_eq!(server.items[0].product_id, in_stock);

    // Local cart is still discarded: partial merge is acceptable.
    assert!(local.lines().is_empty());
  }

  #[tokio::test]
  async fn empty_local_cart_merges_to_nothing() {
    let mut local = LocalCart::load(Box::new(MemoryStore::new()));
    let mut remote = FakeRemote::default();

    let report = merge_local_cart(&mut local, &mut remote).await;
    assert_eq!(report.merged, 0);
    assert!(report.skipped.is_empty());
  }
}
