// core/src/registry.rs

//! The `Conveyor<E>` registry: a type-keyed map from context data types to
//! their registered workflows, with type-erased dispatch.

use crate::core::context::SharedContext;
use crate::core::control::RunOutcome;
use crate::error::ConveyorError;
use crate::workflow::definition::Workflow;

use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::{event, instrument, Level};

/// Type-erased runner so workflows over different `TData` can share one map.
/// `AppErr` is the error type `Conveyor::run` returns.
#[async_trait]
trait AnyWorkflowRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` is a `Box<dyn Any + Send>` holding a `SharedContext<TData>`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<RunOutcome, AppErr>;
}

struct WorkflowRunner<TData, WfErr, AppErr>
where
  TData: 'static + Send + Sync,
  WfErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<WfErr> + From<ConveyorError> + Send + Sync + 'static,
{
  workflow: Arc<Workflow<TData, WfErr>>,
  _phantom_app_err: PhantomData<AppErr>,
}

#[async_trait]
impl<TData, WfErr, AppErr> AnyWorkflowRunner<AppErr> for WorkflowRunner<TData, WfErr, AppErr>
where
  TData: 'static + Send + Sync,
  WfErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<WfErr> + From<ConveyorError> + Send + Sync + 'static,
{
  #[instrument(
        name = "WorkflowRunner::run_erased",
        skip_all,
        fields(target_data_type = %std::any::type_name::<TData>()),
        err(Display)
    )]
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<RunOutcome, AppErr> {
    let typed_ctx = match ctx_obj.downcast::<SharedContext<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected = std::any::type_name::<SharedContext<TData>>();
        event!(Level::ERROR, "Context object type mismatch. Expected {}.", expected);
        return Err(AppErr::from(ConveyorError::TypeMismatch {
          stage: "registry_dispatch".to_string(),
          expected_type: expected.to_string(),
        }));
      }
    };

    event!(Level::DEBUG, "Context downcast successful. Executing workflow.");
    self.workflow.run(typed_ctx).await.map_err(AppErr::from)
  }
}

/// The conveyor registry.
///
/// `AppErr` is the error type `Conveyor::run` returns; it must be
/// constructible from [`ConveyorError`] so registry-level failures (no
/// workflow registered, type mismatch) surface through it.
pub struct Conveyor<AppErr = ConveyorError>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  registry: Mutex<HashMap<TypeId, Arc<dyn AnyWorkflowRunner<AppErr>>>>,
  _phantom_app_err: PhantomData<AppErr>,
}

impl<AppErr> Conveyor<AppErr>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      registry: Mutex::new(HashMap::new()),
      _phantom_app_err: PhantomData,
    }
  }

  /// Registers a workflow, keyed by its context data type. Registering a
  /// second workflow for the same `TData` replaces the first.
  pub fn register_workflow<TData, WfErr>(&self, workflow: Workflow<TData, WfErr>)
  where
    TData: 'static + Send + Sync,
    WfErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
    AppErr: From<WfErr>,
  {
    event!(Level::DEBUG, data_type = %std::any::type_name::<TData>(), "Registering workflow.");
    let runner = WorkflowRunner::<TData, WfErr, AppErr> {
      workflow: Arc::new(workflow),
      _phantom_app_err: PhantomData,
    };
    self
      .registry
      .lock()
      .unwrap()
      .insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  /// Runs the workflow registered for `TData` against the given context.
  pub async fn run<TData>(&self, ctx: SharedContext<TData>) -> Result<RunOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    event!(Level::DEBUG, data_type = %std::any::type_name::<TData>(), "Dispatching workflow.");
    let type_id = TypeId::of::<TData>();

    let runner: Arc<dyn AnyWorkflowRunner<AppErr>>;
    {
      let reg = self.registry.lock().unwrap();
      runner = reg.get(&type_id).cloned().ok_or_else(|| {
        let type_name = std::any::type_name::<TData>();
        event!(Level::ERROR, "No workflow registered for data type {}.", type_name);
        AppErr::from(ConveyorError::Configuration {
          stage: "Conveyor::run".to_string(),
          message: format!("No workflow registered for data type {}", type_name),
        })
      })?;
    }

    let ctx_obj: Box<dyn Any + Send> = Box::new(ctx.clone());
    runner.run_erased(ctx_obj).await
  }
}

impl<AppErr> Default for Conveyor<AppErr>
where
  AppErr: std::error::Error + From<ConveyorError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
