// storefront/src/db.rs

//! Database pool construction and optional demo-data seeding.

use crate::errors::Result;
use sqlx::PgPool;
use tracing::info;

pub async fn connect(database_url: &str) -> std::result::Result<PgPool, sqlx::Error> {
  PgPool::connect(database_url).await
}

/// Inserts a handful of demo products when the catalog is empty. Controlled
/// by the SEED_DB flag; safe to run repeatedly.
pub async fn seed_demo_products(pool: &PgPool) -> Result<()> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
    .fetch_one(pool)
    .await?;
  if existing > 0 {
    info!("Catalog already has {} products, skipping seed.", existing);
    return Ok(());
  }

  let demo: &[(&str, &str, i64, Option<i64>, i32)] = &[
    ("Classic Notebook", "A5 dotted notebook, 180 pages", 1_999, None, 120),
    ("Fountain Pen", "Medium nib, converter included", 54_000, Some(49_900), 35),
    ("Letterpress Card Set", "Set of 12 cards with envelopes", 2_850, None, 200),
    ("Desk Organizer", "Walnut, three compartments", 112_500, None, 8),
  ];

  for &(name, description, price_cents, discount_price_cents, stock) in demo {
    sqlx::query(
      r#"
      INSERT INTO products (name, description, price_cents, discount_price_cents, stock, images, customization_options)
      VALUES ($1, $2, $3, $4, $5, '[]'::jsonb, '[]'::jsonb)
      "#,
    )
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(discount_price_cents)
    .bind(stock)
    .execute(pool)
    .await?;
  }

  info!("Seeded {} demo products.", demo.len());
  Ok(())
}
