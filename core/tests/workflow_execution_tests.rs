// tests/workflow_execution_tests.rs
mod common;

use common::*;
use conveyor::{ConveyorError, RunOutcome, SharedContext, StageControl, Workflow};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_workflow_runs_stages_in_order() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("stage1", false, None),
    ("stage2", false, None),
    ("stage3", false, None),
  ]);

  workflow.on_stage("stage1", create_simple_handler("stage1", " S1"));
  workflow.on_stage("stage2", create_simple_handler("stage2", " S2"));
  workflow.on_stage("stage3", create_simple_handler("stage3", " S3"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), RunOutcome::Completed);

  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.stages_executed, vec!["stage1", "stage2", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_workflow_halts_on_stage_control_halt() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("stageA", false, None),
    ("haltStage", false, None),
    ("stageC", false, None),
  ]);

  workflow.on_stage("stageA", create_simple_handler("stageA", "A"));
  workflow.on_stage("haltStage", |ctx: SharedContext<TestContext>| {
    Box::pin(async move {
      ctx.write().stages_executed.push("haltStage".to_string());
      Ok::<StageControl, ConveyorError>(StageControl::Halt)
    })
  });
  workflow.on_stage("stageC", create_simple_handler("stageC", "C")); // Must not run

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), RunOutcome::Halted);

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only stageA incremented
  assert_eq!(guard.message, "A");
  assert_eq!(guard.stages_executed, vec!["stageA", "haltStage"]);
}

#[tokio::test]
#[serial]
async fn test_workflow_propagates_handler_error() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("good_stage", false, None),
    ("bad_stage", false, None),
    ("another_stage", false, None),
  ]);

  workflow.on_stage("good_stage", create_simple_handler("good_stage", "Good"));
  workflow.on_stage("bad_stage", create_failing_handler("bad_stage", "I am a bad stage!"));
  workflow.on_stage("another_stage", create_simple_handler("another_stage", "NeverRun"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Handler(msg) => assert_eq!(msg, "I am a bad stage!"),
    _ => panic!("Expected TestError::Handler"),
  }

  let guard = ctx.read();
  assert_eq!(guard.counter, 1); // Only good_stage incremented
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.stages_executed, vec!["good_stage", "bad_stage"]);
}

#[tokio::test]
#[serial]
async fn test_workflow_skips_stage_if_condition_met() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("stage1", false, None),
    (
      "stage_to_skip",
      false,
      Some(Arc::new(|ctx: SharedContext<TestContext>| ctx.read().counter > 0)),
    ),
    ("stage3", false, None),
  ]);

  workflow.on_stage("stage1", create_simple_handler("stage1", " S1"));
  workflow.on_stage("stage_to_skip", create_simple_handler("stage_to_skip", " SKIPPED_THIS"));
  workflow.on_stage("stage3", create_simple_handler("stage3", " S3"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), RunOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 2); // stage1 and stage3 ran
  assert_eq!(guard.message, " S1 S3");
  assert_eq!(guard.stages_executed, vec!["stage1", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_workflow_phase_ordering_before_on_after() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[("only_stage", false, None)]);

  workflow.before_stage("only_stage", create_simple_handler("only_stage:before", "B"));
  workflow.on_stage("only_stage", create_simple_handler("only_stage:on", "O"));
  workflow.after_stage("only_stage", create_simple_handler("only_stage:after", "A"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), RunOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.message, "BOA");
  assert_eq!(
    guard.stages_executed,
    vec!["only_stage:before", "only_stage:on", "only_stage:after"]
  );
}

#[tokio::test]
#[serial]
async fn test_workflow_halt_in_before_skips_on_and_after() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[("gated", false, None), ("later", false, None)]);

  workflow.before_stage("gated", |ctx: SharedContext<TestContext>| {
    Box::pin(async move {
      ctx.write().stages_executed.push("gated:before".to_string());
      Ok::<StageControl, ConveyorError>(StageControl::Halt)
    })
  });
  workflow.on_stage("gated", create_simple_handler("gated:on", "NEVER"));
  workflow.on_stage("later", create_simple_handler("later", "NEVER"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), RunOutcome::Halted);
  let guard = ctx.read();
  assert_eq!(guard.counter, 0);
  assert_eq!(guard.stages_executed, vec!["gated:before"]);
}

#[tokio::test]
#[serial]
async fn test_optional_stage_without_handlers_is_skipped() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("stage1", false, None),
    ("optional_unhandled", true, None),
    ("stage3", false, None),
  ]);

  workflow.on_stage("stage1", create_simple_handler("stage1", " S1"));
  workflow.on_stage("stage3", create_simple_handler("stage3", " S3"));

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), RunOutcome::Completed);
  assert_eq!(ctx.read().stages_executed, vec!["stage1", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_multiple_handlers_per_phase_run_in_registration_order() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[("multi", false, None)]);

  workflow.on_stage("multi", create_simple_handler("multi:first", "1"));
  workflow.on_stage("multi", create_simple_handler("multi:second", "2"));
  workflow.on_stage("multi", create_simple_handler("multi:third", "3"));

  let ctx = SharedContext::new(TestContext::default());
  workflow.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.message, "123");
  assert_eq!(guard.counter, 3);
}

#[tokio::test]
#[serial]
async fn test_inserted_stage_runs_in_position() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[("first", false, None), ("last", false, None)]);
  workflow.insert_stage_after("first", "middle", false, None);

  workflow.on_stage("first", create_simple_handler("first", "F"));
  workflow.on_stage("middle", create_simple_handler("middle", "M"));
  workflow.on_stage("last", create_simple_handler("last", "L"));

  let ctx = SharedContext::new(TestContext::default());
  workflow.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().message, "FML");
}

#[tokio::test]
#[serial]
async fn test_removed_stage_does_not_run() {
  setup_tracing();
  let mut workflow = Workflow::<TestContext, TestError>::new(&[
    ("keep1", false, None),
    ("drop_me", false, None),
    ("keep2", false, None),
  ]);

  workflow.on_stage("keep1", create_simple_handler("keep1", "K1"));
  workflow.on_stage("drop_me", create_simple_handler("drop_me", "DROPPED"));
  workflow.on_stage("keep2", create_simple_handler("keep2", "K2"));

  workflow.remove_stage("drop_me");

  let ctx = SharedContext::new(TestContext::default());
  let result = workflow.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), RunOutcome::Completed);
  assert_eq!(ctx.read().message, "K1K2");
}
