// mealcart-flow/src/lib.rs

//! mealcart-flow: ordered, asynchronous step pipelines over shared context data.
//!
//! A pipeline is a list of named steps. Each step may carry `before`, `on` and
//! `after` handlers; every handler receives a clone of the same
//! [`ContextData`] and answers with [`PipelineControl::Continue`] or
//! [`PipelineControl::Stop`]. The first handler error ends the run and is
//! returned as-is.
//!
//! The meal-ordering client builds its cart mutations
//! (`check_preconditions -> apply_local -> mirror_cache -> sync_remote`) and its
//! order placement (`create_payment -> create_order`) on top of this crate.

pub mod core;
pub mod error;
pub mod pipeline;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};
