//! Chat error type.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use gym_core::{Classify, ErrorKind};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("message is empty")]
  EmptyMessage,

  #[error("assistant request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("assistant answered {status}: {body}")]
  Status { status: u16, body: String },

  #[error("assistant reply had no content")]
  EmptyReply,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::EmptyMessage => ErrorKind::Validation,
      Error::Request(_) | Error::Status { .. } | Error::EmptyReply => ErrorKind::Io,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match self {
      Error::EmptyMessage => StatusCode::BAD_REQUEST,
      _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
