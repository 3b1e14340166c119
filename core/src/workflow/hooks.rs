// core/src/workflow/hooks.rs

//! Registration of `before`, `on`, and `after` handlers for workflow stages.

use crate::core::context::{Handler, SharedContext};
use crate::core::control::StageControl;
use crate::workflow::definition::Workflow;
use std::future::Future;

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::ConveyorError> + Send + Sync + 'static,
{
  /// Registers a `before` hook for a stage.
  ///
  /// The handler takes the shared context and resolves to
  /// `Result<StageControl, UserErr>`, where `UserErr` must be convertible
  /// into the workflow's `Err` type.
  pub fn before_stage<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(SharedContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StageControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.before.entry(stage_name.to_string()).or_default().push(handler);
  }

  /// Registers an `on` hook for a stage. Error handling as in
  /// [`Workflow::before_stage`].
  pub fn on_stage<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(SharedContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StageControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.on.entry(stage_name.to_string()).or_default().push(handler);
  }

  /// Registers an `after` hook for a stage. Error handling as in
  /// [`Workflow::before_stage`].
  pub fn after_stage<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(SharedContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StageControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let handler: Handler<TData, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.after.entry(stage_name.to_string()).or_default().push(handler);
  }
}
