//! Error taxonomy shared by every Inspecta crate.

use thiserror::Error;

/// Failures of the signup flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
  #[error("username and password are both required")]
  InvalidInput,

  #[error("username already taken: {0}")]
  DuplicateUser(String),
}

/// Failures of schema introspection and the generic CRUD operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrudError {
  #[error("missing value for column {0:?}")]
  MissingField(String),

  /// Not a column of the table, or the primary key on a write.
  #[error("unknown or read-only column {0:?}")]
  UnknownColumn(String),

  /// Outside the fixed table enumeration, or absent from the live store.
  #[error("unknown table {0:?}")]
  UnknownTable(String),

  #[error("no row in {table} with key {key}")]
  NotFound { table: String, key: String },
}

/// A report slug outside the fixed report list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown report {0:?}")]
pub struct UnknownReport(pub String);
