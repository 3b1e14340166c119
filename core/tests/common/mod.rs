// tests/common/mod.rs
#![allow(dead_code)] // Shared fixtures; not every test file uses every helper

use conveyor::{ConveyorError, SharedContext, StageControl};
use tracing::Level;

// --- Common context struct ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub stages_executed: Vec<String>,
  pub should_halt_at: Option<String>,
}

// --- Common error type for tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  // Stored as a formatted string so the enum stays Eq for assertions.
  #[error("Engine error: {0:?}")]
  Engine(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<ConveyorError> for TestError {
  fn from(ce: ConveyorError) -> Self {
    TestError::Engine(format!("{:?}", ce))
  }
}

// --- Common handler creators ---
pub fn create_simple_handler(
  stage_name: &'static str,
  message_to_append: &'static str,
) -> conveyor::Handler<TestContext, TestError> {
  Box::new(move |ctx: SharedContext<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.stages_executed.push(stage_name_owned.clone());
      tracing::debug!(target: "test_handlers", stage = %stage_name_owned, "executed, counter: {}, message: '{}'", guard.counter, guard.message);
      if let Some(halt_stage) = &guard.should_halt_at {
        if halt_stage == stage_name_owned.as_str() {
          return Ok(StageControl::Halt);
        }
      }
      Ok(StageControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  stage_name: &'static str,
  error_message: &'static str,
) -> conveyor::Handler<TestContext, TestError> {
  Box::new(move |ctx: SharedContext<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    let error_message_owned = error_message.to_string();
    Box::pin(async move {
      ctx.write().stages_executed.push(stage_name_owned.clone());
      tracing::warn!(target: "test_handlers", stage = %stage_name_owned, "failing with: '{}'", error_message_owned);
      Err(TestError::Handler(error_message_owned))
    })
  })
}

// --- Tracing setup (idempotent across the test binary) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
