// tests/context_management_tests.rs
mod common;

use common::*;
use mealcart_flow::{ContextData, Pipeline, PipelineControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn later_steps_see_earlier_writes() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("subtotal", false, None), ("delivery", false, None)]);

  pipeline.on_root("subtotal", |ctx: ContextData<TallyContext>| async move {
    ctx.write().amount = 600;
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  pipeline.on_root("delivery", |ctx: ContextData<TallyContext>| async move {
    let mut guard = ctx.write();
    assert_eq!(guard.amount, 600);
    guard.amount += 300;
    Ok::<_, TestError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(TallyContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().amount, 900);
}

#[test]
fn clones_share_the_same_data() {
  let original = ContextData::new(TallyContext::default());
  let handle = original.clone();
  handle.write().amount = 42;
  assert_eq!(original.read().amount, 42);

  assert_eq!(handle.snapshot().amount, 42);
  assert_eq!(*handle.map_read(|t| &t.amount), 42);
}
