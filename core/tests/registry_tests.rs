// tests/registry_tests.rs
mod common;

use common::*;
use conveyor::{Conveyor, ConveyorError, RunOutcome, SharedContext, StageControl, Workflow};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextAlpha {
  val: String,
}
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextBeta {
  num: i32,
}

#[tokio::test]
async fn test_registry_runs_correct_workflow() {
  setup_tracing();
  let engine = Conveyor::<TestError>::new();

  let mut wf_alpha = Workflow::<RegistryContextAlpha, TestError>::new(&[("alpha_task", false, None)]);
  wf_alpha.on_stage("alpha_task", |ctx: SharedContext<RegistryContextAlpha>| {
    Box::pin(async move {
      ctx.write().val = "alpha_processed".to_string();
      Ok::<StageControl, ConveyorError>(StageControl::Continue)
    })
  });
  engine.register_workflow(wf_alpha);

  let mut wf_beta = Workflow::<RegistryContextBeta, TestError>::new(&[("beta_task", false, None)]);
  wf_beta.on_stage("beta_task", |ctx: SharedContext<RegistryContextBeta>| {
    Box::pin(async move {
      ctx.write().num = 100;
      Ok::<StageControl, ConveyorError>(StageControl::Continue)
    })
  });
  engine.register_workflow(wf_beta);

  let ctx_alpha = SharedContext::new(RegistryContextAlpha::default());
  let res_alpha = engine.run(ctx_alpha.clone()).await;
  assert!(res_alpha.is_ok());
  assert_eq!(res_alpha.unwrap(), RunOutcome::Completed);
  assert_eq!(ctx_alpha.read().val, "alpha_processed");

  let ctx_beta = SharedContext::new(RegistryContextBeta::default());
  let res_beta = engine.run(ctx_beta.clone()).await;
  assert!(res_beta.is_ok());
  assert_eq!(res_beta.unwrap(), RunOutcome::Completed);
  assert_eq!(ctx_beta.read().num, 100);
}

#[tokio::test]
async fn test_registry_workflow_not_found() {
  setup_tracing();
  let engine = Conveyor::<TestError>::new();
  // No workflows registered

  #[derive(Clone, Debug, Default)]
  struct UnregisteredContext;

  let ctx = SharedContext::new(UnregisteredContext);
  let result = engine.run(ctx).await;

  assert!(result.is_err());
  if let Err(TestError::Engine(s)) = result {
    assert!(s.contains("Configuration"));
    assert!(s.contains("No workflow registered"));
    assert!(s.contains("UnregisteredContext"));
  } else {
    panic!("Expected Engine(Configuration) for unregistered workflow, got {:?}", result);
  }
}

#[tokio::test]
async fn test_registry_workflow_itself_errors() {
  setup_tracing();
  let engine = Conveyor::<TestError>::new();

  let mut wf = Workflow::<RegistryContextAlpha, TestError>::new(&[("alpha_fail", false, None)]);
  wf.on_stage("alpha_fail", |_ctx: SharedContext<RegistryContextAlpha>| {
    Box::pin(async move { Err(TestError::Handler("Alpha workflow failed".to_string())) })
  });
  engine.register_workflow(wf);

  let ctx = SharedContext::new(RegistryContextAlpha::default());
  let result = engine.run(ctx.clone()).await;

  assert!(result.is_err());
  assert_eq!(result.err().unwrap(), TestError::Handler("Alpha workflow failed".to_string()));
}

// Registry used with the engine's own error type as the application error.
#[tokio::test]
async fn test_registry_with_conveyor_error_default() {
  setup_tracing();
  let engine = Conveyor::<ConveyorError>::new();

  #[derive(Clone, Debug, Default)]
  struct SimpleCtx {
    count: i32,
  }

  let mut workflow = Workflow::<SimpleCtx, ConveyorError>::new(&[("task", false, None)]);
  workflow.on_stage("task", |ctx: SharedContext<SimpleCtx>| {
    Box::pin(async move {
      ctx.write().count = 1;
      Ok::<StageControl, ConveyorError>(StageControl::Continue)
    })
  });
  engine.register_workflow(workflow);

  let ctx = SharedContext::new(SimpleCtx::default());
  let result = engine.run(ctx.clone()).await;
  assert!(result.is_ok());
  assert_eq!(ctx.read().count, 1);
}
