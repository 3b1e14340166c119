// core/src/workflow/definition.rs

//! The `Workflow<TData, Err>` struct and methods for its construction and
//! structural modification.

use crate::core::context::Handler;
use crate::core::stage::{SkipWhen, StageDef};
use std::collections::HashMap;

/// A staged async process over a shared context of type `TData`.
///
/// `Err` is the error type the workflow's handlers return. It must be
/// `From<ConveyorError>` so that engine-level failures (a non-optional stage
/// with no handlers, a registry type mismatch) surface through the same
/// error channel as handler failures.
pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::ConveyorError> + Send + Sync + 'static,
{
  /// Ordered stage definitions.
  pub(crate) stages: Vec<StageDef<TData>>,

  // Handlers for each phase of each stage, keyed by stage name.
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<crate::error::ConveyorError> + Send + Sync + 'static,
{
  /// Creates a new `Workflow` from `(name, optional, skip_when)` stage
  /// definitions, in execution order.
  pub fn new(stage_defs: &[(&str, bool, Option<SkipWhen<TData>>)]) -> Self {
    let stages = stage_defs
      .iter()
      .map(|(name, optional, skip_when)| StageDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_when: skip_when.clone(),
      })
      .collect();

    Self {
      stages,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Panics if the named stage is absent. Registering a handler against a
  /// missing stage is a programming error (typically a typo), not a runtime
  /// condition, so it fails fast at setup time.
  pub(crate) fn ensure_stage_exists(&self, stage_name: &str) {
    if !self.stages.iter().any(|s| s.name == stage_name) {
      panic!(
        "Conveyor setup error: stage '{}' not found in workflow definition.",
        stage_name
      );
    }
  }

  fn ensure_stage_not_exists(&self, stage_name: &str) {
    if self.stages.iter().any(|s| s.name == stage_name) {
      panic!(
        "Conveyor setup error: stage '{}' already exists in workflow definition.",
        stage_name
      );
    }
  }

  // --- Structural edits ---

  pub fn insert_stage_before<S: Into<String>>(
    &mut self,
    existing_stage: &str,
    new_stage: S,
    optional: bool,
    skip_when: Option<SkipWhen<TData>>,
  ) {
    self.ensure_stage_exists(existing_stage);
    let idx = self.stages.iter().position(|s| s.name == existing_stage).unwrap();
    let name: String = new_stage.into();
    self.ensure_stage_not_exists(&name);
    self.stages.insert(idx, StageDef { name, optional, skip_when });
  }

  pub fn insert_stage_after<S: Into<String>>(
    &mut self,
    existing_stage: &str,
    new_stage: S,
    optional: bool,
    skip_when: Option<SkipWhen<TData>>,
  ) {
    self.ensure_stage_exists(existing_stage);
    let idx = self.stages.iter().position(|s| s.name == existing_stage).unwrap();
    let name: String = new_stage.into();
    self.ensure_stage_not_exists(&name);
    self.stages.insert(idx + 1, StageDef { name, optional, skip_when });
  }

  /// Removes a stage and all handlers registered against it. Removing a
  /// stage that does not exist is a no-op.
  pub fn remove_stage(&mut self, stage_name: &str) {
    if let Some(idx) = self.stages.iter().position(|s| s.name == stage_name) {
      self.stages.remove(idx);
      self.before.remove(stage_name);
      self.on.remove(stage_name);
      self.after.remove(stage_name);
    }
  }

  pub fn set_optional(&mut self, stage_name: &str, optional: bool) {
    self.ensure_stage_exists(stage_name);
    self.stages.iter_mut().find(|s| s.name == stage_name).unwrap().optional = optional;
  }

  pub fn set_skip_when(&mut self, stage_name: &str, skip_when: Option<SkipWhen<TData>>) {
    self.ensure_stage_exists(stage_name);
    self.stages.iter_mut().find(|s| s.name == stage_name).unwrap().skip_when = skip_when;
  }
}
