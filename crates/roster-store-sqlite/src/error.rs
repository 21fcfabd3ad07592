//! Error type for `roster-store-sqlite`.

use roster_core::store::{FailureKind, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("nssID {0:?} is already in use")]
  DuplicateNssId(String),

  #[error("stored level {0} is out of range")]
  InvalidLevel(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn failure_kind(&self) -> FailureKind {
    match self {
      Error::Core(_) => FailureKind::Invalid,
      Error::DuplicateNssId(_) => FailureKind::Conflict,
      Error::Database(_) | Error::InvalidLevel(_) => FailureKind::Internal,
    }
  }
}
