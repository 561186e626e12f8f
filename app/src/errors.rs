// foodtruck/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use orderflow::FlowError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  /// The payments provider answered with a non-success status.
  #[error("Payment Provider Error: {message}")]
  Provider {
    message: String,
    details: Option<serde_json::Value>,
  },

  #[error("HTTP Client Error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl AppError {
  /// Extra detail attached to provider failures.
  pub fn details(&self) -> Option<&serde_json::Value> {
    match self {
      AppError::Provider { details, .. } => details.as_ref(),
      _ => None,
    }
  }

  /// Rendering used by the `/functions/*` endpoints: `{error, details?}` with
  /// 500 for every failure except authentication (401).
  pub fn function_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Server function failed");
    let status = match self {
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut body = json!({ "error": self.public_message() });
    if let Some(details) = self.details() {
      body["details"] = details.clone();
    }
    HttpResponse::build(status).json(body)
  }

  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::Payment(m)
      | AppError::Internal(m) => m.clone(),
      AppError::Provider { message, .. } => message.clone(),
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      other => other.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) | AppError::PipelineHaltedByHandler => StatusCode::CONFLICT,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      AppError::Provider { .. } | AppError::Http(_) => StatusCode::BAD_GATEWAY,
      AppError::Workflow { source } => match source {
        FlowError::HandlerError { source } => source
          .downcast_ref::<AppError>()
          .map_or(StatusCode::INTERNAL_SERVER_ERROR, |app_err| app_err.status_code()),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let mut body = json!({ "error": self.public_message() });
    if let Some(details) = self.details() {
      body["details"] = details.clone();
    }
    HttpResponse::build(self.status_code()).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
