// core/src/workflow/execution.rs

//! The `Workflow::run()` loop: stage iteration, skip conditions, phase
//! ordering, halt and error propagation.

use crate::core::context::SharedContext;
use crate::core::control::{RunOutcome, StageControl};
use crate::error::ConveyorError;
use crate::workflow::definition::Workflow;
use tracing::{event, instrument, span, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  /// Executes the workflow against the given shared context.
  ///
  /// A non-optional stage with no handlers at all fails the run with
  /// [`ConveyorError::HandlerMissing`], converted into `Err`; an optional
  /// stage with no handlers is skipped silently. Within a stage the phases
  /// run in `before` → `on` → `after` order, each handler seeing the
  /// writes of the ones before it.
  #[instrument(
        name = "Workflow::run",
        skip_all,
        fields(
            context_data_type = %std::any::type_name::<TData>(),
            error_type = %std::any::type_name::<Err>(),
            num_stages = self.stages.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx: SharedContext<TData>) -> Result<RunOutcome, Err> {
    event!(Level::DEBUG, "Workflow run starting.");

    for (stage_idx, stage_def) in self.stages.iter().enumerate() {
      let stage_name = stage_def.name.as_str();

      let stage_span = span!(
        Level::INFO,
        "workflow_stage",
        stage = stage_name,
        stage_index = stage_idx,
        optional = stage_def.optional
      );
      let _stage_guard = stage_span.enter();
      event!(Level::DEBUG, "Processing stage.");

      if let Some(skip_when) = &stage_def.skip_when {
        if skip_when(ctx.clone()) {
          event!(Level::INFO, "Stage skipped by skip_when condition.");
          continue;
        }
      }

      let has_before = self.before.get(stage_name).map_or(false, |v| !v.is_empty());
      let has_on = self.on.get(stage_name).map_or(false, |v| !v.is_empty());
      let has_after = self.after.get(stage_name).map_or(false, |v| !v.is_empty());

      if !has_before && !has_on && !has_after {
        if stage_def.optional {
          event!(Level::DEBUG, "Optional stage has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, "Non-optional stage has no handlers.");
        return Err(Err::from(ConveyorError::HandlerMissing {
          stage: stage_def.name.clone(),
        }));
      }

      for (phase, handlers) in [
        ("before", self.before.get(stage_name)),
        ("on", self.on.get(stage_name)),
        ("after", self.after.get(stage_name)),
      ] {
        let Some(handlers) = handlers else { continue };
        for (handler_idx, handler_fn) in handlers.iter().enumerate() {
          let handler_span = span!(Level::DEBUG, "stage_handler", phase, handler_index = handler_idx);
          let _handler_guard = handler_span.enter();
          match handler_fn(ctx.clone()).await {
            Ok(StageControl::Continue) => {}
            Ok(StageControl::Halt) => {
              event!(Level::INFO, phase, "Workflow halted by handler.");
              return Ok(RunOutcome::Halted);
            }
            Err(e) => {
              event!(Level::ERROR, phase, error = %e, "Handler failed.");
              return Err(e);
            }
          }
        }
      }

      event!(Level::DEBUG, "Stage finished successfully.");
    }

    event!(Level::DEBUG, "Workflow run completed successfully.");
    Ok(RunOutcome::Completed)
  }
}
