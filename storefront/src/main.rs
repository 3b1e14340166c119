// storefront/src/main.rs

use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::{db, errors, web, workflows};

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match db::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if app_config.seed_db {
    if let Err(e) = db::seed_demo_products(&db_pool).await {
      tracing::error!(error = %e, "Failed to seed database.");
    }
  }

  // Conveyor<AppError> so engine.run returns our AppError.
  let engine = Arc::new(conveyor::Conveyor::<errors::AppError>::new());

  let app_state = AppState {
    db_pool: db_pool.clone(),
    engine: engine.clone(),
    config: app_config.clone(),
  };

  workflows::register_all_workflows(&engine, &app_state);

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
