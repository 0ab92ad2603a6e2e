//! JSON REST API for the Inspecta dashboard.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`TableStore`] and [`ReportStore`]. Authentication, TLS and transport
//! concerns are the caller's responsibility: the router must only be
//! reachable by authenticated sessions.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(inspecta_api::api_router(store.clone()).route_layer(auth_gate))
//! ```

pub mod error;
pub mod home;
pub mod reports;
pub mod tables;

use std::sync::Arc;

use axum::{Router, routing::get};
use inspecta_core::store::{ReportStore, TableStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TableStore + ReportStore + 'static,
{
  Router::new()
    .route("/", get(home::handler))
    // Tables
    .route("/tables", get(tables::list))
    .route("/tables/{table}/schema", get(tables::schema::<S>))
    .route("/tables/{table}/form", get(tables::create_form::<S>))
    .route("/tables/{table}/keys", get(tables::keys::<S>))
    .route("/tables/{table}/rows", get(tables::read_all::<S>).post(tables::create::<S>))
    .route(
      "/tables/{table}/rows/{key}",
      get(tables::get_one::<S>)
        .put(tables::update::<S>)
        .delete(tables::delete::<S>),
    )
    // Reports
    .route("/reports", get(reports::list))
    .route("/reports/{name}", get(reports::get_one::<S>))
    .with_state(store)
}
