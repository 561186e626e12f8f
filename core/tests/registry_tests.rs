// tests/registry_tests.rs
mod common;

use common::*;
use orderflow::{ContextData, FlowRegistry, Pipeline, PipelineResult};
use serial_test::serial;

#[derive(Clone, Debug, Default)]
struct OtherContext;

#[tokio::test]
#[serial]
async fn runs_pipeline_registered_for_context_type() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false, None)]);
  pipeline.on_step("only", recording_handler("only"));
  registry.register_pipeline(pipeline);

  assert!(registry.is_registered::<TestContext>());
  assert!(!registry.is_registered::<OtherContext>());

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(registry.run(ctx.clone()).await, Ok(PipelineResult::Completed));
  assert_eq!(ctx.read().counter, 1);
}

#[tokio::test]
#[serial]
async fn unregistered_context_type_is_a_configuration_error() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  let result = registry.run(ContextData::new(OtherContext)).await;
  match result {
    Err(TestError::Flow(msg)) => assert!(msg.contains("ConfigurationError"), "unexpected: {}", msg),
    other => panic!("expected configuration error, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn handler_errors_surface_through_registry() {
  setup_tracing();
  let registry = FlowRegistry::<TestError>::new();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("bad", false, None)]);
  pipeline.on_step("bad", failing_handler("bad", "nope"));
  registry.register_pipeline(pipeline);

  let result = registry.run(ContextData::new(TestContext::default())).await;
  assert_eq!(result, Err(TestError::Handler("nope".to_string())));
}
