// storefront/src/pricing.rs

//! Pure pricing computation shared by the cart display path and the
//! order-commit path.
//!
//! Both call sites MUST price through [`quote`] so the amount shown before
//! checkout and the amount persisted on the order are byte-identical. All
//! money is integer cents; the 18% tax is rounded half-up to the cent.

use serde::Serialize;

/// Fixed tax rate. Not configurable per region.
pub const TAX_RATE_PERCENT: i64 = 18;
/// Shipping is free strictly above this subtotal (1000.00).
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 100_000;
/// Flat shipping fee (100.00) charged at or below the threshold.
pub const FLAT_SHIPPING_FEE_CENTS: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeLine {
  pub unit_price_cents: i64,
  pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
  pub items_cents: i64,
  pub tax_cents: i64,
  pub shipping_cents: i64,
  pub total_cents: i64,
}

/// Computes subtotal, tax, shipping and total for a list of charge lines.
pub fn quote(lines: &[ChargeLine]) -> Quote {
  let items_cents: i64 = lines.iter().map(|line| line.unit_price_cents * line.quantity as i64).sum();
  // Round half-up to the nearest cent.
  let tax_cents = (items_cents * TAX_RATE_PERCENT + 50) / 100;
  let shipping_cents = if items_cents > FREE_SHIPPING_THRESHOLD_CENTS {
    0
  } else {
    FLAT_SHIPPING_FEE_CENTS
  };
  let total_cents = items_cents + tax_cents + shipping_cents;

  Quote {
    items_cents,
    tax_cents,
    shipping_cents,
    total_cents,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn line(unit_price_cents: i64, quantity: i32) -> ChargeLine {
    ChargeLine { unit_price_cents, quantity }
  }

  #[test]
  fn total_is_subtotal_plus_tax_plus_shipping() {
    let q = quote(&[line(12_345, 3), line(999, 1)]);
    assert_eq!(q.items_cents, 12_345 * 3 + 999);
    assert_eq!(q.total_cents, q.items_cents + q.tax_cents + q.shipping_cents);
  }

  #[test]
  fn tax_is_18_percent_rounded_half_up() {
    // 3.33 subtotal -> 0.5994 tax -> 0.60
    assert_eq!(quote(&[line(333, 1)]).tax_cents, 60);
    // 0.25 subtotal -> 0.045 tax -> exactly half a cent rounds up to 0.05
    assert_eq!(quote(&[line(25, 1)]).tax_cents, 5);
    // 1.00 subtotal -> 0.18 exactly
    assert_eq!(quote(&[line(100, 1)]).tax_cents, 18);
  }

  #[test]
  fn shipping_boundary_at_exactly_1000_is_not_free() {
    let q = quote(&[line(100_000, 1)]);
    assert_eq!(q.items_cents, FREE_SHIPPING_THRESHOLD_CENTS);
    assert_eq!(q.shipping_cents, FLAT_SHIPPING_FEE_CENTS);
  }

  #[test]
  fn shipping_is_free_strictly_above_1000() {
    let q = quote(&[line(100_001, 1)]);
    assert_eq!(q.shipping_cents, 0);
  }

  #[test]
  fn checkout_figures_for_two_at_500() {
    // Cart of one line: unit price 500.00, quantity 2.
    let q = quote(&[line(50_000, 2)]);
    assert_eq!(q.items_cents, 100_000); // 1000.00
    assert_eq!(q.tax_cents, 18_000); // 180.00
    assert_eq!(q.shipping_cents, 10_000); // 100.00, since 1000 is not > 1000
    assert_eq!(q.total_cents, 128_000); // 1280.00
  }

  #[test]
  fn display_and_commit_quotes_are_identical() {
    let lines = [line(7_777, 2), line(50, 9)];
    // Same function, same input, same output - the display path and the
    // order-commit path cannot disagree.
    assert_eq!(quote(&lines), quote(&lines));
  }
}
