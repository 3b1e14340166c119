// storefront/src/workflows/mod.rs

//! Defines and registers the conveyor workflows used by the storefront.

use crate::errors::AppError;
use crate::state::AppState;
use conveyor::Conveyor;
use std::sync::Arc;

pub mod contexts;

pub mod add_to_cart;
pub mod place_order;

/// Registers all workflows with the engine. Called once at startup.
pub fn register_all_workflows(engine: &Arc<Conveyor<AppError>>, app_state: &AppState) {
  tracing::info!("Registering conveyor workflows...");

  add_to_cart::register_add_to_cart_workflow(engine, app_state);
  place_order::register_place_order_workflow(engine, app_state);

  tracing::info!("All application workflows registered.");
}
