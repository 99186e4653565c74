//! Error types for `gym-core`.

use serde::Serialize;
use thiserror::Error;

use crate::{amount::AmountError, category::Category};

/// Coarse classification of a failure, shared by every layer so callers can
/// pick a status code or message without matching concrete error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Parse,
  Validation,
  Conflict,
  Io,
}

/// Implemented by every error type that crosses the store boundary.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("none of the sheets {expected:?} exist in the workbook (found {found:?})")]
  MissingSheet {
    expected: &'static [&'static str],
    found:    Vec<String>,
  },

  #[error("required column {column:?} is missing from sheet {sheet:?}")]
  MissingColumn {
    sheet:  String,
    column: &'static str,
  },

  #[error("sheet {sheet:?} has no {column} column to edit")]
  AbsentColumn {
    sheet:  String,
    column: &'static str,
  },

  #[error("{} {key:?} not found", .category.noun())]
  RecordNotFound { category: Category, key: String },

  #[error("{count} {} records share the name {key:?}", .category.noun())]
  AmbiguousKey {
    category: Category,
    key:      String,
    count:    usize,
  },

  #[error("unknown {} field {field:?}", .category.noun())]
  UnknownField { category: Category, field: String },

  #[error("{0} cannot be edited directly")]
  ReadOnlyField(&'static str),

  #[error("{field} must be numeric: {source}")]
  NotNumeric {
    field:  &'static str,
    #[source]
    source: AmountError,
  },

  #[error("invalid value {value:?} for {field}: {reason}")]
  InvalidValue {
    field:  &'static str,
    value:  String,
    reason: &'static str,
  },

  #[error("{0} is required")]
  MissingKey(&'static str),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingSheet { .. } | Self::MissingColumn { .. } => ErrorKind::Parse,
      Self::RecordNotFound { .. } => ErrorKind::NotFound,
      Self::AmbiguousKey { .. } => ErrorKind::Conflict,
      Self::UnknownField { .. }
      | Self::ReadOnlyField(_)
      | Self::AbsentColumn { .. }
      | Self::NotNumeric { .. }
      | Self::InvalidValue { .. }
      | Self::MissingKey(_) => ErrorKind::Validation,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
