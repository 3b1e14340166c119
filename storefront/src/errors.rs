// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use conveyor::ConveyorError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Insufficient stock for '{product}': {available} available, {requested} requested")]
  InsufficientStock {
    product: String,
    available: i32,
    requested: i32,
  },

  #[error("No items in cart")]
  EmptyCart,

  /// Partial failure inside the order-commit unit of work. Unlike the
  /// validation errors above, the caller cannot fix this by correcting
  /// input; state may need operator attention.
  #[error("Order commit failed at stage '{stage}' (order: {order_id:?}): {detail}")]
  Fatal {
    order_id: Option<Uuid>,
    stage: String,
    detail: String,
  },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: ConveyorError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // Used by HTTP handlers when a workflow halts gracefully but the request
  // cannot be considered satisfied.
  #[error("Workflow run was halted by a handler.")]
  WorkflowHalted,
}

// Lets handlers use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      return AppError::Sqlx(err.downcast::<sqlx::Error>().unwrap());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Unauthorized(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::InsufficientStock { .. } => HttpResponse::BadRequest().json(json!({"error": self.to_string()})),
      AppError::EmptyCart => HttpResponse::BadRequest().json(json!({"error": "No items in cart"})),
      AppError::Fatal { order_id, stage, detail } => {
        // Full context goes to the log; the client gets a generic failure
        // with support instructions, since rollback is not guaranteed.
        tracing::error!(?order_id, %stage, %detail, "FATAL: partial order-commit failure");
        HttpResponse::InternalServerError().json(json!({
            "error": "Order processing failed. Please contact support before retrying.",
            "reference": order_id.map(|id| id.to_string()),
        }))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Workflow { source } => {
        tracing::error!(workflow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
      AppError::WorkflowHalted => {
        HttpResponse::Conflict().json(json!({"error": "Process halted as expected by business logic."}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
