// core/src/core/mod.rs

//! Building blocks shared by workflow definition and execution: the shared
//! context wrapper, control-flow signals, and stage definitions.

pub mod context;
pub mod control;
pub mod stage;

pub use context::{Handler, SharedContext};
pub use control::{RunOutcome, StageControl};
pub use stage::{SkipWhen, StageDef};
