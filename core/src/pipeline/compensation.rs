// orderflow/src/pipeline/compensation.rs

use crate::core::context_data::ContextData;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs the compensations of `completed` steps, last completed first.
  ///
  /// Every compensation is attempted; failures are logged and swallowed so the
  /// caller can still report the error that triggered the unwind.
  pub(crate) async fn unwind(&self, completed: &[&str], ctx_data: &ContextData<TData>) {
    for step_name in completed.iter().rev() {
      let Some(compensators) = self.compensations.get(*step_name) else {
        continue;
      };
      for compensate in compensators.iter().rev() {
        event!(Level::INFO, step_name = %step_name, "Compensating step.");
        if let Err(e) = compensate(ctx_data.clone()).await {
          event!(Level::ERROR, step_name = %step_name, error = %e, "Compensation failed.");
        }
      }
    }
  }
}
