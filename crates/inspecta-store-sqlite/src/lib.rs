//! SQLite backend for the Inspecta dashboard.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on the connection's
//! dedicated thread without blocking the async runtime. A single
//! [`SqliteStore`] is opened at startup and shared by every session.

mod encode;
mod reports;
mod schema;
mod store;
mod tables;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
