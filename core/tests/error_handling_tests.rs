// tests/error_handling_tests.rs
mod common;
use common::*;
use conveyor::{ConveyorError, SharedContext, StageControl, Workflow};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_run_catches_handler_missing() {
  setup_tracing();
  let workflow = Workflow::<TestContext, TestError>::new(&[("missing", false, None)]);
  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx).await;
  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Engine(s) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("missing"));
    }
    other => panic!("Expected TestError::Engine(HandlerMissing), got {:?}", other),
  }
}

// A workflow whose error type IS ConveyorError.
#[tokio::test]
#[serial]
async fn test_workflow_with_conveyor_error_type() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, ConveyorError>::new(&[("task", false, None)]);

  workflow.on_stage("task", |ctx: SharedContext<TestContext>| {
    Box::pin(async move {
      ctx.write().counter = 1;
      Ok::<StageControl, ConveyorError>(StageControl::Continue)
    })
  });

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;
  assert!(result.is_ok());
  assert_eq!(ctx.read().counter, 1);

  let mut failing = Workflow::<TestContext, ConveyorError>::new(&[("fail_task", false, None)]);
  failing.on_stage("fail_task", |_ctx| {
    Box::pin(async move { Err(ConveyorError::Internal("Intentional engine error".to_string())) })
  });
  let fail_ctx = SharedContext::new(TestContext::default());
  let fail_result = failing.run(fail_ctx).await;
  assert!(fail_result.is_err());
  match fail_result.err().unwrap() {
    ConveyorError::Internal(s) => assert_eq!(s, "Intentional engine error"),
    _ => panic!("Expected ConveyorError::Internal"),
  }
}

#[tokio::test]
#[serial]
async fn test_error_in_after_phase_fails_run() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[("work", false, None)]);

  workflow.on_stage("work", create_simple_handler("work:on", "W"));
  workflow.after_stage("work", create_failing_handler("work:after", "after blew up"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.err().unwrap(), TestError::Handler("after blew up".to_string()));
  // The on-phase handler still ran before the failure.
  assert_eq!(ctx.read().message, "W");
}
