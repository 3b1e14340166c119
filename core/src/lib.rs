// src/lib.rs

//! Conveyor: an asynchronous, type-safe workflow engine.
//!
//! Conveyor models a multi-step business process as a `Workflow`: an ordered
//! list of named stages with `before`/`on`/`after` hooks.
//!
//!  - Handlers are async and share state through a lockable [`SharedContext`].
//!  - Any handler can halt the run early ([`StageControl::Halt`]) or fail it
//!    with the workflow's own error type.
//!  - Stages can be optional, carry skip conditions, and be inserted or
//!    removed after construction.
//!  - A type-keyed [`Conveyor`] registry dispatches a context value to the
//!    workflow registered for its data type.

pub mod core;
pub mod error;
pub mod registry;
pub mod workflow;

// --- Re-exports for the public API ---

pub use crate::core::context::{Handler, SharedContext};
pub use crate::core::control::{RunOutcome, StageControl};
pub use crate::core::stage::{SkipWhen, StageDef};

pub use crate::workflow::definition::Workflow;

pub use crate::error::{ConveyorError, ConveyorResult};

pub use crate::registry::Conveyor;
