//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use inspecta_core::{
  error::{AuthError, CrudError},
  store::{FailureKind, StoreError},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by the domain failure it carries.
  ///
  /// An unknown table means the fixed table list and the live database
  /// have drifted apart, so it is logged at error level even though the
  /// client only sees a 404.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      FailureKind::Auth(AuthError::InvalidInput) => ApiError::BadRequest(e.to_string()),
      FailureKind::Auth(AuthError::DuplicateUser(_)) => ApiError::Conflict(e.to_string()),
      FailureKind::Crud(CrudError::MissingField(_) | CrudError::UnknownColumn(_)) => {
        ApiError::BadRequest(e.to_string())
      }
      FailureKind::Crud(CrudError::UnknownTable(_)) => {
        tracing::error!(error = %e, "table lookup failed");
        ApiError::NotFound(e.to_string())
      }
      FailureKind::Crud(CrudError::NotFound { .. }) => ApiError::NotFound(e.to_string()),
      FailureKind::Constraint => ApiError::BadRequest(e.to_string()),
      FailureKind::Backend => {
        tracing::error!(error = %e, "store failure");
        ApiError::Store(Box::new(e))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
