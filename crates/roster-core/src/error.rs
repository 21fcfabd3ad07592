//! Error types for `roster-core`.

use thiserror::Error;

use crate::person::{PersonId, RecordKind};

#[derive(Debug, Error)]
pub enum Error {
  #[error("name must not be empty")]
  EmptyName,

  #[error("nssID must not be empty")]
  EmptyNssId,

  #[error("{kind} {id} not found")]
  PersonNotFound { kind: RecordKind, id: PersonId },

  #[error("replacement for record {expected} carries id {actual}")]
  IdMismatch { expected: PersonId, actual: PersonId },

  #[error("record {id} is a {actual}, expected a {expected}")]
  KindMismatch {
    id:       PersonId,
    expected: RecordKind,
    actual:   RecordKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
