// orderflow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Type mismatch while dispatching context (expected {expected_type}, at: '{step_name}')")]
  TypeMismatch { step_name: String, expected_type: String },

  #[error("Error in handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for '{step_name}': {message}")]
  ConfigurationError { step_name: String, message: String },

  #[error("Internal workflow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow error that already carries a FlowError keeps it as its source.
    FlowError::HandlerError { source: err }
  }
}

impl FlowError {
  /// Step name attached to the error, when the variant carries one.
  pub fn step_name(&self) -> Option<&str> {
    match self {
      FlowError::StepNotFound { step_name }
      | FlowError::HandlerMissing { step_name }
      | FlowError::TypeMismatch { step_name, .. }
      | FlowError::ConfigurationError { step_name, .. } => Some(step_name),
      FlowError::HandlerError { .. } | FlowError::Internal(_) => None,
    }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
