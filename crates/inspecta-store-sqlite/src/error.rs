//! Error type for `inspecta-store-sqlite`.

use inspecta_core::{
  error::{AuthError, CrudError},
  store::{FailureKind, StoreError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error(transparent)]
  Crud(#[from] CrudError),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("incompatible schema: {0}")]
  IncompatibleSchema(String),
}

fn is_constraint_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl StoreError for Error {
  fn kind(&self) -> FailureKind<'_> {
    match self {
      Error::Auth(e) => FailureKind::Auth(e),
      Error::Crud(e) => FailureKind::Crud(e),
      Error::Database(e) if is_constraint_violation(e) => FailureKind::Constraint,
      Error::Database(_) | Error::IncompatibleSchema(_) => FailureKind::Backend,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
