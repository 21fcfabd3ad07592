//! The `PersonStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::person::{NewPerson, Person, PersonId, RecordKind};

/// How a backend failure should be reported to whoever asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The input was rejected by validation.
  Invalid,
  /// The input clashes with a stored record, e.g. a reused `nssID`.
  Conflict,
  /// Anything else: I/O, corruption, bugs.
  Internal,
}

/// Error type of a [`PersonStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn failure_kind(&self) -> FailureKind { FailureKind::Internal }
}

impl StoreError for std::convert::Infallible {}

/// Abstraction over a roster storage backend.
///
/// Every mutating operation returns the authoritative stored state, so callers
/// never need to patch their own copies.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: StoreError;

  /// All records of `kind`, in id order.
  fn list(
    &self,
    kind: RecordKind,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// A single record. Returns `None` if no record of `kind` has that id.
  fn get(
    &self,
    kind: RecordKind,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Validate and persist a new record; the store assigns its id.
  fn create(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite every editable field of an existing record. The kind is taken
  /// from `input`. Returns `None` if no such record exists.
  fn update(
    &self,
    id: PersonId,
    input: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a record. Returns `false` if it did not exist.
  fn delete(
    &self,
    kind: RecordKind,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
