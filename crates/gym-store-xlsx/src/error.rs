//! Error type for `gym-store-xlsx`.

use std::path::PathBuf;

use gym_core::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] gym_core::Error),

  #[error("no {label}_*.xlsx file in {}", .dir.display())]
  NoBackingFile { dir: PathBuf, label: &'static str },

  #[error("invalid file pattern: {0}")]
  Pattern(#[from] glob::PatternError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("could not read workbook: {0}")]
  Read(#[from] calamine::XlsxError),

  #[error("could not write workbook: {0}")]
  Write(#[from] rust_xlsxwriter::XlsxError),

  /// The file changed between the caller's read and this write.
  #[error("the file has changed since revision {expected} (now {actual}); reload and retry")]
  Conflict { expected: String, actual: String },

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Core(e) => e.kind(),
      Self::NoBackingFile { .. } => ErrorKind::NotFound,
      Self::Read(_) => ErrorKind::Parse,
      Self::Conflict { .. } => ErrorKind::Conflict,
      Self::Pattern(_) | Self::Io(_) | Self::Write(_) | Self::Join(_) => ErrorKind::Io,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
