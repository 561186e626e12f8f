// tests/compensation_tests.rs
mod common;

use common::*;
use orderflow::{ContextData, Pipeline, PipelineResult, SkipCondition};
use std::sync::Arc;

fn three_step_pipeline() -> Pipeline<TestContext, TestError> {
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("reserve", false, None), ("charge", false, None), ("notify", false, None)]);
  pipeline.on_step("reserve", recording_handler("reserve"));
  pipeline.compensate_step("reserve", recording_compensation("undo_reserve"));
  pipeline.on_step("charge", recording_handler("charge"));
  pipeline.compensate_step("charge", recording_compensation("undo_charge"));
  pipeline
}

#[tokio::test]
async fn failure_unwinds_completed_steps_newest_first() {
  setup_tracing();
  let mut pipeline = three_step_pipeline();
  pipeline.on_step("notify", failing_handler("notify", "smtp down"));
  pipeline.compensate_step("notify", recording_compensation("undo_notify"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Err(TestError::Handler("smtp down".to_string())));
  // The failing step itself did not complete, so it is not compensated.
  assert_eq!(ctx.read().compensated, vec!["undo_charge", "undo_reserve"]);
}

#[tokio::test]
async fn stop_does_not_compensate() {
  setup_tracing();
  let mut pipeline = three_step_pipeline();
  pipeline.on_step("notify", recording_handler("notify"));

  let ctx = ContextData::new(TestContext {
    stop_at: Some("charge".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Stopped));
  assert!(ctx.read().compensated.is_empty());
}

#[tokio::test]
async fn skipped_steps_are_not_compensated() {
  setup_tracing();
  let skip: SkipCondition<TestContext> = Arc::new(|_: ContextData<TestContext>| true);
  let mut pipeline = three_step_pipeline();
  pipeline.set_skip_condition("charge", Some(skip)).unwrap();
  pipeline.on_step("notify", failing_handler("notify", "late failure"));

  let ctx = ContextData::new(TestContext::default());
  assert!(pipeline.run(ctx.clone()).await.is_err());
  assert_eq!(ctx.read().compensated, vec!["undo_reserve"]);
}

#[tokio::test]
async fn failing_compensation_keeps_original_error_and_continues() {
  setup_tracing();
  let mut pipeline = three_step_pipeline();
  pipeline.compensate_step("charge", |_ctx: ContextData<TestContext>| async move {
    Err::<(), _>(TestError::Handler("refund rejected".to_string()))
  });
  pipeline.on_step("notify", failing_handler("notify", "original"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Err(TestError::Handler("original".to_string())));
  assert_eq!(ctx.read().compensated, vec!["undo_charge", "undo_reserve"]);
}

#[tokio::test]
async fn successful_run_never_compensates() {
  setup_tracing();
  let mut pipeline = three_step_pipeline();
  pipeline.on_step("notify", recording_handler("notify"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert!(ctx.read().compensated.is_empty());
}
