//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolodex_core::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// An extractor rejection, reported with axum's own status.
  #[error("rejected request ({0}): {1}")]
  Rejected(StatusCode, String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::Rejected(status, m) => (status, Json(json!({ "error": m }))).into_response(),
      ApiError::Validation(e) => {
        tracing::warn!(%e, "rejected invalid input");
        let fields: Vec<_> = e
          .errors
          .iter()
          .map(|f| json!({ "field": f.field, "message": f.problem.to_string() }))
          .collect();
        (
          StatusCode::UNPROCESSABLE_ENTITY,
          Json(json!({ "error": "validation failed", "fields": fields })),
        )
          .into_response()
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal store error" })),
        )
          .into_response()
      }
    }
  }
}
