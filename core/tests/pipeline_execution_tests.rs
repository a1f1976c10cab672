// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use mealcart_flow::{ContextData, Pipeline, PipelineControl, PipelineResult};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn steps_run_in_declared_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("create_payment", false, None),
    ("create_order", false, None),
    ("notify", false, None),
  ]);
  pipeline.on_root("create_payment", adding_handler("create_payment", 100));
  pipeline.on_root("create_order", adding_handler("create_order", 10));
  pipeline.on_root("notify", adding_handler("notify", 1));

  let ctx = ContextData::new(TallyContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Completed));
  let guard = ctx.read();
  assert_eq!(guard.amount, 111);
  assert_eq!(guard.steps_executed, vec!["create_payment", "create_order", "notify"]);
}

#[tokio::test]
#[serial]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("check_preconditions", false, None),
    ("apply_local", false, None),
  ]);
  pipeline.on_root("check_preconditions", adding_handler("check_preconditions", 0));
  pipeline.on_root("apply_local", adding_handler("apply_local", 5));

  let ctx = ContextData::new(TallyContext {
    stop_at: Some("check_preconditions".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Stopped));
  assert_eq!(ctx.read().amount, 0);
  assert_eq!(ctx.read().steps_executed, vec!["check_preconditions"]);
}

#[tokio::test]
#[serial]
async fn handler_error_is_returned_unchanged() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("create_payment", false, None),
    ("create_order", false, None),
    ("after_order", false, None),
  ]);
  pipeline.on_root("create_payment", adding_handler("create_payment", 300));
  pipeline.on_root("create_order", failing_handler("create_order", "order service unavailable"));
  pipeline.on_root("after_order", adding_handler("after_order", 1));

  let ctx = ContextData::new(TallyContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Err(TestError::Handler("order service unavailable".to_string())));
  assert_eq!(ctx.read().steps_executed, vec!["create_payment", "create_order"]);
}

#[tokio::test]
#[serial]
async fn before_on_after_run_in_phase_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("sync_remote", false, None)]);
  pipeline.after_root("sync_remote", adding_handler("after", 0));
  pipeline.on_root("sync_remote", adding_handler("on", 0));
  pipeline.before_root("sync_remote", adding_handler("before", 0));

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().steps_executed, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_passes_over_step() {
  setup_tracing();
  let skip_when_empty: mealcart_flow::SkipCondition<TallyContext> = Arc::new(|ctx: ContextData<TallyContext>| ctx.read().amount == 0);
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[
    ("mirror_cache", false, Some(skip_when_empty)),
    ("sync_remote", false, None),
  ]);
  pipeline.on_root("mirror_cache", adding_handler("mirror_cache", 1));
  pipeline.on_root("sync_remote", adding_handler("sync_remote", 1));

  let ctx = ContextData::new(TallyContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().steps_executed, vec!["sync_remote"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TallyContext, TestError>::new(&[("apply_local", false, None), ("audit", true, None)]);
  pipeline.on_root("apply_local", adding_handler("apply_local", 2));

  let ctx = ContextData::new(TallyContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().amount, 2);
}

#[tokio::test]
#[serial]
async fn inserted_step_runs_in_its_slot() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TallyContext, TestError>::new(&[("create_payment", false, None), ("create_order", false, None)]);
  pipeline.insert_after_step("create_payment", "reserve_stock", false, None).unwrap();
  pipeline.on_root("create_payment", adding_handler("create_payment", 0));
  pipeline.on_root("reserve_stock", adding_handler("reserve_stock", 0));
  pipeline.on_root("create_order", |ctx: ContextData<TallyContext>| async move {
    ctx.write().steps_executed.push("create_order".to_string());
    Ok::<_, TestError>(PipelineControl::Continue)
  });

  assert_eq!(pipeline.step_names(), vec!["create_payment", "reserve_stock", "create_order"]);

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["create_payment", "reserve_stock", "create_order"]);
}
