// core/examples/workflow_halt.rs

use conveyor::{ConveyorError, RunOutcome, SharedContext, StageControl, Workflow};
use tracing::{error, info};

#[derive(Clone, Debug, Default)]
struct HaltContext {
  log: Vec<String>,
  halt_signal_received: bool,
}

#[tokio::main]
async fn main() -> Result<(), ConveyorError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Workflow Halt Example ---");

  let mut workflow = Workflow::<HaltContext, ConveyorError>::new(&[
    ("stage_one", false, None),
    ("stage_two_halts", false, None),  // This stage issues a halt
    ("stage_three_after", false, None), // This stage must not execute
  ]);

  workflow.on_stage("stage_one", |ctx: SharedContext<HaltContext>| {
    Box::pin(async move {
      let msg = "Stage One executed.".to_string();
      info!("{}", msg);
      ctx.write().log.push(msg);
      Ok::<_, ConveyorError>(StageControl::Continue)
    })
  });

  workflow.on_stage("stage_two_halts", |ctx: SharedContext<HaltContext>| {
    Box::pin(async move {
      let msg = "Stage Two executed - issuing HALT.".to_string();
      info!("{}", msg);
      let mut data = ctx.write();
      data.log.push(msg);
      data.halt_signal_received = true;
      Ok::<_, ConveyorError>(StageControl::Halt)
    })
  });

  workflow.on_stage("stage_three_after", |ctx: SharedContext<HaltContext>| {
    Box::pin(async move {
      // Should never be reached
      let msg = "Stage Three executed (SHOULD NOT HAPPEN).".to_string();
      error!("{}", msg);
      ctx.write().log.push(msg);
      Ok::<_, ConveyorError>(StageControl::Continue)
    })
  });

  let ctx = SharedContext::new(HaltContext::default());

  info!("Starting workflow run (expecting halt)...");
  let result = workflow.run(ctx.clone()).await?;

  match result {
    RunOutcome::Completed => error!("Workflow completed, but was expected to halt!"),
    RunOutcome::Halted => info!("Workflow halted as expected."),
  }

  let final_state = ctx.read();
  info!("Execution log:");
  for entry in &final_state.log {
    info!("- {}", entry);
  }
  assert!(final_state.halt_signal_received, "Halt signal was not processed.");
  assert_eq!(final_state.log.len(), 2, "Incorrect number of stages executed.");

  Ok(())
}
