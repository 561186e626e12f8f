// orderflow/src/core/context.rs

//! Boxed handler types stored by a `Pipeline<TData, Err>`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A pipeline step handler.
///
/// Takes a clone of the run's `ContextData<TData>` and resolves to either a
/// flow signal or the pipeline's error type.
///
/// Lock guards taken on the context must be dropped before the first `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// An undo action registered for a step.
///
/// Runs only when the step completed and a later step of the same run failed.
/// A failing compensator is logged; it never replaces the original error.
pub type Compensator<TData, Err> =
  Box<dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<(), Err>> + Send>> + Send + Sync>;
