// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConveyorError {
  #[error("Stage not found: {stage}")]
  StageNotFound { stage: String },

  #[error("Handler missing for non-optional stage: {stage}")]
  HandlerMissing { stage: String },

  #[error("Type mismatch during context downcast (expected {expected_type}, stage: '{stage}')")]
  TypeMismatch { stage: String, expected_type: String },

  #[error("Error in user-provided handler or external operation. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for stage '{stage}': {message}")]
  Configuration { stage: String, message: String },

  #[error("Internal conveyor error: {0}")]
  Internal(String),
}

// Lets handlers written against anyhow flow into the engine's error type.
impl From<AnyhowError> for ConveyorError {
  fn from(err: AnyhowError) -> Self {
    ConveyorError::Handler { source: err }
  }
}

pub type ConveyorResult<T, E = ConveyorError> = std::result::Result<T, E>;
