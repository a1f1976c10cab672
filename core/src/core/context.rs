// mealcart-flow/src/core/context.rs

//! The boxed handler type stored by a [`Pipeline`](crate::Pipeline).

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A pipeline step handler.
///
/// Takes a clone of the run's `ContextData<TData>` and resolves to
/// `Result<PipelineControl, Err>`.
///
/// Handlers must drop every `.read()` / `.write()` guard before the next `.await`.
/// Copy what you need out of the context, release the guard, then do I/O.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
