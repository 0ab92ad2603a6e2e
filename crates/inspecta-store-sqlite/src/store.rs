//! [`SqliteStore`]: the SQLite implementation of the Inspecta store traits.
//!
//! This module owns the connection and the `users` table. Table CRUD lives
//! in `tables.rs`, the fixed reports in `reports.rs`.

use std::path::Path;

use inspecta_core::{
  credential::{Credential, hash_password},
  error::AuthError,
  store::CredentialStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  schema::{DATASET_SCHEMA, USERS_SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The dashboard's single shared database connection.
///
/// Cloning is cheap: the inner connection is reference-counted. Statements
/// run one at a time on the connection's thread; there is no further
/// locking, so concurrent edits of one row are last-write-wins.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the `users` table.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Create any of the four dataset tables that are missing.
  pub async fn init_dataset(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(DATASET_SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::info!("dataset tables ensured");
    Ok(())
  }

  async fn find_credential(&self, username: &str) -> Result<Option<Credential>> {
    let username = username.to_owned();

    let cred = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT username, password_hash FROM users WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(Credential {
                  username:      row.get(0)?,
                  password_hash: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    Ok(cred)
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = crate::Error;

  async fn ensure_schema(&self) -> Result<()> {
    let has_hash_column = self
      .conn
      .call(|conn| {
        conn.execute_batch(USERS_SCHEMA)?;
        let found: i64 = conn.query_row(
          "SELECT COUNT(*) FROM pragma_table_info('users') WHERE name = 'password_hash'",
          [],
          |row| row.get(0),
        )?;
        Ok(found > 0)
      })
      .await?;

    // An older `users` table keeps its digest in a `password` column.
    if !has_hash_column {
      tracing::error!("users table has no password_hash column");
      return Err(crate::Error::IncompatibleSchema(
        "users table has no password_hash column; migrate it before serving".to_owned(),
      ));
    }
    Ok(())
  }

  async fn register(&self, username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
      return Err(AuthError::InvalidInput.into());
    }
    if self.find_credential(username).await?.is_some() {
      return Err(AuthError::DuplicateUser(username.to_owned()).into());
    }

    let username_owned = username.to_owned();
    let hash = hash_password(password);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
          rusqlite::params![username_owned, hash],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(%username, "registered user");
    Ok(())
  }

  async fn verify(&self, username: &str, password: &str) -> Result<bool> {
    Ok(
      self
        .find_credential(username)
        .await?
        .is_some_and(|cred| cred.matches(password)),
    )
  }
}
