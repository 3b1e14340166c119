// core/src/core/stage.rs

//! Definition of a single workflow stage.

use super::SharedContext;

/// Skip condition evaluated against the shared context before a stage runs.
/// Returning `true` skips the stage.
pub type SkipWhen<TData> = std::sync::Arc<dyn Fn(SharedContext<TData>) -> bool + Send + Sync + 'static>;

/// One named stage in a workflow: its name, whether it may legally have no
/// handlers, and an optional skip condition.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_when: Option<SkipWhen<T>>,
}

// SkipWhen is an Arc<dyn Fn>, so Debug is hand-rolled.
impl<T: 'static + Send + Sync> std::fmt::Debug for StageDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StageDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_when_present", &self.skip_when.is_some())
      .finish()
  }
}
