//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No valid session or Basic credentials on a protected request.
  #[error("authentication required")]
  Unauthorized,
  /// A login attempt with the wrong username or password.
  #[error("invalid credentials")]
  InvalidCredentials,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let mut res =
      (StatusCode::UNAUTHORIZED, Json(json!({ "error": self.to_string() }))).into_response();
    if let Error::Unauthorized = self {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"roster\""),
      );
    }
    res
  }
}
