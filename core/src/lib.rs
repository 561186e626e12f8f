// orderflow/src/lib.rs

//! orderflow: an async, step-based workflow engine.
//!
//! A [`Pipeline`] is an ordered list of named steps operating on one shared
//! [`ContextData`]. Each step can have:
//!  - `before` / `on` / `after` handlers, run in that order.
//!  - An `optional` flag (no handlers is fine, failures are not).
//!  - A skip condition evaluated against the context right before the step.
//!  - Compensations: undo actions that run, newest step first, for every
//!    step that already completed when a later step fails.
//!
//! Handlers return [`PipelineControl::Stop`] to end a run early without error.
//! A stopped run never triggers compensations.
//!
//! A [`FlowRegistry`] keys pipelines by their context data type, so an HTTP
//! handler only needs to build the context and call `run`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::{Compensator, Handler};
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::error::{FlowError, FlowResult};

pub use crate::pipeline::Pipeline;

pub use crate::registry::FlowRegistry;
