//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing or invalid credentials on a route that needs a caller.
  #[error("unauthorized")]
  Unauthorized,

  #[error(transparent)]
  Core(#[from] rapsheet_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

// Malformed bodies, bad CNICs and unknown severities inside a record all
// surface here.
impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(rejection.body_text())
  }
}

impl ApiError {
  fn status(&self) -> StatusCode {
    use rapsheet_core::Error as E;
    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        E::AccessDenied(_) => StatusCode::FORBIDDEN,
        E::NotFound(_) => StatusCode::NOT_FOUND,
        E::CnicMismatch { .. }
        | E::InvalidCnic(_)
        | E::InvalidSeverity(_)
        | E::UnknownSeverity(_)
        | E::EmptyIdentity => StatusCode::BAD_REQUEST,
        E::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let mut res = (status, Json(json!({ "error": self.to_string() })))
      .into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"rapsheet\""),
      );
    }
    res
  }
}
