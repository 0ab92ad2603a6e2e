//! Storage traits.
//!
//! Traits are implemented by storage backends (e.g. `inspecta-store-sqlite`).
//! Higher layers (`inspecta-api`, `inspecta-server`) depend on these
//! abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  error::{AuthError, CrudError},
  record::{FieldValue, FieldValues, Record, RecordSet},
  report::{Report, ReportOutput},
  schema::TableSchema,
};

// ─── Error classification ────────────────────────────────────────────────────

/// What went wrong, as far as a caller deciding on a response cares.
#[derive(Debug)]
pub enum FailureKind<'a> {
  Auth(&'a AuthError),
  Crud(&'a CrudError),
  /// The backend refused the write (NOT NULL, UNIQUE, CHECK, foreign key).
  Constraint,
  /// The backend itself failed (I/O, SQL, decoding).
  Backend,
}

/// Backend error types expose the domain error they carry, if any.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind<'_>;
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Owner of the `users` table.
pub trait CredentialStore: Send + Sync {
  type Error: StoreError;

  /// Create the `users` table if it does not exist. Idempotent.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Store a new user with the digest of `password`.
  ///
  /// Fails with [`AuthError::InvalidInput`] when either argument is empty
  /// and [`AuthError::DuplicateUser`] when the username is taken.
  fn register<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// `true` iff `username` exists and `password` hashes to its stored
  /// digest. Unknown users are `false`, not an error.
  fn verify<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Schema introspection plus generic CRUD over the dataset tables.
///
/// Every operation takes a [`TableSchema`] freshly produced by
/// [`TableStore::describe`]; implementations hold no per-table state.
pub trait TableStore: Send + Sync {
  type Error: StoreError;

  /// Resolve ordered columns, declared types and the key column of
  /// `table`. Fails with [`CrudError::UnknownTable`] for names outside the
  /// fixed enumeration or tables missing from the store.
  fn describe<'a>(
    &'a self,
    table: &'a str,
  ) -> impl Future<Output = Result<TableSchema, Self::Error>> + Send + 'a;

  /// Every row, in storage order. Loads the whole table into memory.
  fn read_all<'a>(
    &'a self,
    schema: &'a TableSchema,
  ) -> impl Future<Output = Result<RecordSet, Self::Error>> + Send + 'a;

  /// The row whose key equals `key`, if any.
  fn get_row<'a>(
    &'a self,
    schema: &'a TableSchema,
    key: &'a FieldValue,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + 'a;

  /// Current key values, read fresh so callers never offer deleted rows.
  fn primary_keys<'a>(
    &'a self,
    schema: &'a TableSchema,
  ) -> impl Future<Output = Result<Vec<FieldValue>, Self::Error>> + Send + 'a;

  /// Insert a row. `values` must name every non-key column and nothing
  /// else; the key is assigned by the store and returned.
  fn create<'a>(
    &'a self,
    schema: &'a TableSchema,
    values: FieldValues,
  ) -> impl Future<Output = Result<FieldValue, Self::Error>> + Send + 'a;

  /// Overwrite every non-key column of the row at `key`.
  ///
  /// Fails with [`CrudError::NotFound`] if no row matches.
  fn update<'a>(
    &'a self,
    schema: &'a TableSchema,
    key: &'a FieldValue,
    values: FieldValues,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the row at `key`. Deleting a missing key succeeds.
  fn delete<'a>(
    &'a self,
    schema: &'a TableSchema,
    key: &'a FieldValue,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Reports ─────────────────────────────────────────────────────────────────

pub trait ReportStore: Send + Sync {
  type Error: StoreError;

  fn run_report(
    &self,
    report: Report,
  ) -> impl Future<Output = Result<ReportOutput, Self::Error>> + Send + '_;
}
