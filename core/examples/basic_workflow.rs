// core/examples/basic_workflow.rs

use conveyor::{ConveyorError, RunOutcome, SharedContext, StageControl, Workflow};
use tracing::info;

// Context data carried through the workflow.
#[derive(Clone, Debug, Default)]
struct BasicContext {
  message_log: Vec<String>,
  counter: i32,
}

#[tokio::main]
async fn main() -> Result<(), ConveyorError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Workflow Example ---");

  // Workflow<TData, Err> where Err must be From<ConveyorError>.
  // This example uses ConveyorError directly; applications typically define
  // their own error enum with #[from] ConveyorError.
  let mut workflow = Workflow::<BasicContext, ConveyorError>::new(&[
    ("stage_alpha", false, None), // Stage name, optional, skip_when
    ("stage_beta", false, None),
    ("stage_gamma", false, None),
  ]);

  workflow.on_stage("stage_alpha", |ctx: SharedContext<BasicContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter += 1;
      let msg = format!("Alpha executed: counter = {}", data.counter);
      info!("{}", msg);
      data.message_log.push(msg);
      Ok::<_, ConveyorError>(StageControl::Continue)
    })
  });

  workflow.on_stage("stage_beta", |ctx: SharedContext<BasicContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter *= 2;
      let msg = format!("Beta executed: counter = {}", data.counter);
      info!("{}", msg);
      data.message_log.push(msg);
      Ok::<_, ConveyorError>(StageControl::Continue)
    })
  });

  workflow.on_stage("stage_gamma", |ctx: SharedContext<BasicContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter -= 1;
      let msg = format!("Gamma executed: counter = {}", data.counter);
      info!("{}", msg);
      data.message_log.push(msg);
      Ok::<_, ConveyorError>(StageControl::Continue)
    })
  });

  let ctx = SharedContext::new(BasicContext {
    message_log: Vec::new(),
    counter: 5,
  });

  info!("Starting workflow run...");
  let result = workflow.run(ctx.clone()).await?;

  match result {
    RunOutcome::Completed => info!("Workflow completed successfully!"),
    RunOutcome::Halted => info!("Workflow halted early."),
  }

  let final_state = ctx.read();
  info!("Final counter value: {}", final_state.counter);
  info!("Execution log:");
  for entry in &final_state.message_log {
    info!("- {}", entry);
  }

  // (5+1)*2 - 1 = 11
  assert_eq!(final_state.counter, 11);
  assert_eq!(final_state.message_log.len(), 3);

  Ok(())
}
