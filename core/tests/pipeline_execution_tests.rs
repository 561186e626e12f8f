// tests/pipeline_execution_tests.rs
mod common;

use common::*;
use orderflow::{ContextData, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use std::sync::Arc;

#[tokio::test]
async fn runs_steps_in_order_through_all_phases() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("first", false, None), ("second", false, None)]);
  pipeline.before_step("first", recording_handler("first_before"));
  pipeline.on_step("first", recording_handler("first_on"));
  pipeline.after_step("first", recording_handler("first_after"));
  pipeline.on_step("second", recording_handler("second_on"));

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Completed));
  let guard = ctx.read();
  assert_eq!(guard.counter, 4);
  assert_eq!(
    guard.steps_executed,
    vec!["first_before", "first_on", "first_after", "second_on"]
  );
}

#[tokio::test]
async fn stop_halts_remaining_handlers_and_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("b", false, None)]);
  pipeline.on_step("a", recording_handler("a"));
  pipeline.after_step("a", recording_handler("a_after"));
  pipeline.on_step("b", recording_handler("b"));

  let ctx = ContextData::new(TestContext {
    stop_at: Some("a".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result, Ok(PipelineResult::Stopped));
  assert_eq!(ctx.read().steps_executed, vec!["a"]);
}

#[tokio::test]
async fn skip_condition_bypasses_step() {
  setup_tracing();
  let skip: SkipCondition<TestContext> = Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter > 0);
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("b", false, Some(skip)), ("c", false, None)]);
  pipeline.on_step("a", recording_handler("a"));
  pipeline.on_step("b", recording_handler("b"));
  pipeline.on_step("c", recording_handler("c"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().steps_executed, vec!["a", "c"]);
}

#[tokio::test]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("maybe", true, None)]);
  pipeline.on_step("a", recording_handler("a"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().counter, 1);
}

#[tokio::test]
async fn required_step_without_handlers_fails() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("missing", false, None)]);
  pipeline.on_step("a", recording_handler("a"));

  let result = pipeline.run(ContextData::new(TestContext::default())).await;
  match result {
    Err(TestError::Flow(msg)) => assert!(msg.contains("HandlerMissing"), "unexpected: {}", msg),
    other => panic!("expected HandlerMissing, got {:?}", other),
  }
}

#[tokio::test]
async fn handler_error_is_returned_and_later_steps_do_not_run() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("b", false, None)]);
  pipeline.on_step("a", failing_handler("a", "boom"));
  pipeline.on_step("b", recording_handler("b"));

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(
    pipeline.run(ctx.clone()).await,
    Err(TestError::Handler("boom".to_string()))
  );
  assert_eq!(ctx.read().steps_executed, vec!["a"]);
}

#[tokio::test]
async fn structural_edits_reshape_the_step_list() {
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("a", false, None), ("c", false, None)]);
  pipeline.insert_after_step("a", "b", false, None).unwrap();
  pipeline.insert_before_step("a", "start", true, None).unwrap();
  assert_eq!(pipeline.step_names(), vec!["start", "a", "b", "c"]);

  assert!(pipeline.insert_after_step("nope", "x", false, None).is_err());
  assert!(pipeline.insert_after_step("a", "c", false, None).is_err());

  pipeline.remove_step("start");
  pipeline.set_optional("c", true).unwrap();
  assert_eq!(pipeline.step_names(), vec!["a", "b", "c"]);
  assert!(pipeline.set_optional("start", true).is_err());
}

#[tokio::test]
async fn handlers_can_await_between_context_accesses() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("slow", false, None)]);
  pipeline.on_step("slow", |ctx: ContextData<TestContext>| async move {
    let start = ctx.with(|c| c.counter);
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ctx.update(|c| c.counter = start + 10);
    Ok::<_, TestError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.snapshot().counter, 10);
}
