//! HTTP server for the Inspecta restaurant-inspection dashboard.
//!
//! Combines the session-aware `/auth` endpoints with the table and report
//! API from [`inspecta_api`], which is only reachable once the caller's
//! session is authenticated.

pub mod auth;
pub mod session;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use inspecta_core::store::{CredentialStore, ReportStore, TableStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use session::{SessionRegistry, require_login};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INSPECTA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub database_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          8501,
      database_path: PathBuf::from("restaurant_inspections.db"),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Built once at startup and dropped at shutdown; nothing in the server
/// reaches the store or the sessions any other way.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionRegistry>,
}

impl<S> AppState<S> {
  pub fn new(store: S) -> Self {
    Self {
      store:    Arc::new(store),
      sessions: Arc::new(SessionRegistry::new()),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CredentialStore + TableStore + ReportStore + Clone + 'static,
{
  let dashboard = inspecta_api::api_router(state.store.clone())
    .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

  Router::new()
    .route("/auth/signup", post(auth::signup::<S>))
    .route("/auth/login",  post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/me",     get(auth::me))
    .with_state(state)
    .merge(dashboard)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use inspecta_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.init_dataset().await.unwrap();
    AppState::new(store)
  }

  async fn oneshot_raw(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    cookie: Option<&str>,
    body:   Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
      builder = builder.header(header::COOKIE, c);
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// The `name=value` pair of the session cookie set by a response.
  fn set_cookie(resp: &axum::response::Response) -> String {
    let raw = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
  }

  fn creds(user: &str, pass: &str) -> Value { json!({ "username": user, "password": pass }) }

  async fn signup_and_login(state: &AppState<SqliteStore>) -> String {
    let resp = oneshot_raw(
      state.clone(), "POST", "/auth/signup", None, Some(creds("alice", "secret123")),
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(
      state.clone(), "POST", "/auth/login", None, Some(creds("alice", "secret123")),
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    set_cookie(&resp)
  }

  // ── Gate ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn anonymous_requests_return_401() {
    let state = make_state().await;
    for (method, uri) in [
      ("GET", "/"),
      ("GET", "/tables"),
      ("GET", "/tables/establishment/rows"),
      ("DELETE", "/tables/establishment/rows/1"),
      ("GET", "/reports/top-fines"),
    ] {
      let resp = oneshot_raw(state.clone(), method, uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn forged_cookie_is_anonymous() {
    let state = make_state().await;
    let cookie = format!("{}={}", session::SESSION_COOKIE, uuid::Uuid::new_v4());
    let resp = oneshot_raw(state, "GET", "/tables", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Signup / login ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signup_rejects_empty_and_duplicate() {
    let state = make_state().await;

    let resp = oneshot_raw(state.clone(), "POST", "/auth/signup", None, Some(creds("", "pw"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = oneshot_raw(state.clone(), "POST", "/auth/signup", None, Some(creds("bob", "pw"))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(state, "POST", "/auth/signup", None, Some(creds("bob", "other"))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn wrong_password_returns_401_without_cookie() {
    let state = make_state().await;
    oneshot_raw(state.clone(), "POST", "/auth/signup", None, Some(creds("alice", "secret123"))).await;

    let resp = oneshot_raw(state.clone(), "POST", "/auth/login", None, Some(creds("alice", "wrong"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.headers().contains_key(header::SET_COOKIE));

    let resp = oneshot_raw(state, "POST", "/auth/login", None, Some(creds("bob", "x"))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn login_issues_a_fresh_cookie_over_a_planted_one() {
    let state = make_state().await;
    oneshot_raw(state.clone(), "POST", "/auth/signup", None, Some(creds("alice", "secret123"))).await;

    let planted = format!("{}={}", session::SESSION_COOKIE, uuid::Uuid::new_v4());
    let resp = oneshot_raw(
      state.clone(), "POST", "/auth/login", Some(&planted), Some(creds("alice", "secret123")),
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let issued = set_cookie(&resp);
    assert_ne!(issued, planted);

    let resp = oneshot_raw(state.clone(), "GET", "/tables", Some(&planted), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = oneshot_raw(state, "GET", "/tables", Some(&issued), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn logout_drops_the_session_entry() {
    let state = make_state().await;
    let cookie = signup_and_login(&state).await;
    assert_eq!(state.sessions.len().await, 1);

    oneshot_raw(state.clone(), "POST", "/auth/logout", Some(&cookie), None).await;
    assert!(state.sessions.is_empty().await);
  }

  #[tokio::test]
  async fn me_reflects_session_state() {
    let state = make_state().await;

    let resp = oneshot_raw(state.clone(), "GET", "/auth/me", None, None).await;
    assert_eq!(json_body(resp).await, json!({ "authenticated": false, "user": null }));

    let cookie = signup_and_login(&state).await;
    let resp = oneshot_raw(state, "GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(json_body(resp).await, json!({ "authenticated": true, "user": "alice" }));
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn logged_in_session_can_crud_then_logout_regates() {
    let state = make_state().await;
    let cookie = signup_and_login(&state).await;

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/tables/establishment/rows",
      Some(&cookie),
      Some(json!({
        "name": "Cafe X", "facility_type": "Restaurant", "address": "1 Main St",
        "city": "Chicago", "state": "IL", "zip": 60601, "latitude": 41.9,
        "longitude": -87.6, "ward": 42, "risk_level": "Low"
      })),
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let key = json_body(resp).await["key"].as_i64().unwrap();

    let resp = oneshot_raw(
      state.clone(), "GET", "/tables/establishment/rows", Some(&cookie), None,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rows = json_body(resp).await;
    assert_eq!(rows["rows"][0]["name"], "Cafe X");
    assert_eq!(rows["rows"][0]["license_no"], key);

    let resp = oneshot_raw(state.clone(), "POST", "/auth/logout", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = oneshot_raw(
      state.clone(), "GET", "/tables/establishment/rows", Some(&cookie), None,
    ).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = oneshot_raw(state, "GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(json_body(resp).await["authenticated"], false);
  }
}
