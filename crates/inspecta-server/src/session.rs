//! Per-client sessions and the gate in front of the dashboard API.
//!
//! Each browser is identified by an opaque random cookie. The registry maps
//! that cookie to a [`Session`]; a missing cookie or an unknown id is an
//! anonymous session. Sessions live in memory for the process lifetime.

use std::collections::HashMap;

use axum::{
  extract::{FromRequestParts, Request},
  http::request::Parts,
  middleware::Next,
  response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use inspecta_api::ApiError;
use inspecta_core::session::Session;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::AppState;

pub const SESSION_COOKIE: &str = "inspecta_session";

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct SessionRegistry {
  sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
  pub fn new() -> Self { Self::default() }

  /// The session for `id`; unknown ids are anonymous.
  pub async fn get(&self, id: Uuid) -> Session {
    self.sessions.read().await.get(&id).cloned().unwrap_or_default()
  }

  /// Start an authenticated session for `user` under a freshly minted id,
  /// discarding whatever was stored under `previous`.
  ///
  /// The id a client arrived with is never promoted, so a cookie planted
  /// before login stays anonymous.
  pub async fn login(&self, previous: Option<Uuid>, user: &str) -> Uuid {
    let id = Uuid::new_v4();
    let mut session = Session::Anonymous;
    session.login(user);

    let mut sessions = self.sessions.write().await;
    if let Some(previous) = previous {
      sessions.remove(&previous);
    }
    sessions.insert(id, session);
    id
  }

  /// Forget the session `id`; later requests carrying it are anonymous.
  pub async fn logout(&self, id: Uuid) {
    self.sessions.write().await.remove(&id);
  }

  pub async fn len(&self) -> usize { self.sessions.read().await.len() }

  pub async fn is_empty(&self) -> bool { self.sessions.read().await.is_empty() }
}

// ─── Cookies ─────────────────────────────────────────────────────────────────

pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
  jar
    .get(SESSION_COOKIE)
    .and_then(|c| Uuid::parse_str(c.value()).ok())
}

pub fn session_cookie(id: Uuid) -> Cookie<'static> {
  Cookie::build(Cookie::new(SESSION_COOKIE, id.to_string()))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
  Cookie::build(Cookie::new(SESSION_COOKIE, ""))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// The caller's cookie id (if any) and the session it maps to.
pub struct CurrentSession {
  pub id:      Option<Uuid>,
  pub session: Session,
}

impl<S: Clone + Send + Sync + 'static> FromRequestParts<AppState<S>> for CurrentSession {
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let id = session_id(&jar);
    let session = match id {
      Some(id) => state.sessions.get(id).await,
      None => Session::Anonymous,
    };
    Ok(CurrentSession { id, session })
  }
}

// ─── Gate ────────────────────────────────────────────────────────────────────

/// Middleware: reject anonymous sessions before any table or report
/// handler runs.
pub async fn require_login(
  current: CurrentSession,
  req: Request,
  next: Next,
) -> Response {
  match current.session.current_user() {
    Some(user) => {
      tracing::debug!(%user, path = %req.uri().path(), "authenticated request");
      next.run(req).await
    }
    None => ApiError::Unauthorized("log in first".to_owned()).into_response(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn unknown_ids_are_anonymous() {
    let reg = SessionRegistry::new();
    assert_eq!(reg.get(Uuid::new_v4()).await, Session::Anonymous);
  }

  #[tokio::test]
  async fn login_and_logout_transitions() {
    let reg = SessionRegistry::new();

    let id = reg.login(None, "alice").await;
    assert_eq!(reg.get(id).await, Session::Authenticated("alice".into()));

    reg.logout(id).await;
    assert_eq!(reg.get(id).await, Session::Anonymous);
    assert!(reg.is_empty().await);
  }

  #[tokio::test]
  async fn login_never_reuses_the_presented_id() {
    let reg = SessionRegistry::new();
    let planted = Uuid::new_v4();

    let id = reg.login(Some(planted), "alice").await;
    assert_ne!(id, planted);
    assert_eq!(reg.get(planted).await, Session::Anonymous);

    // Logging in again replaces the old entry rather than adding one.
    let again = reg.login(Some(id), "alice").await;
    assert_ne!(again, id);
    assert_eq!(reg.get(id).await, Session::Anonymous);
    assert_eq!(reg.len().await, 1);
  }

  #[tokio::test]
  async fn registry_does_not_grow_across_login_cycles() {
    let reg = SessionRegistry::new();
    for _ in 0..1000 {
      let id = reg.login(None, "alice").await;
      reg.logout(id).await;
    }
    assert_eq!(reg.len().await, 0);
  }

  #[tokio::test]
  async fn sessions_are_independent() {
    let reg = SessionRegistry::new();
    let a = reg.login(None, "alice").await;
    let b = Uuid::new_v4();
    assert!(reg.get(a).await.is_authenticated());
    assert!(!reg.get(b).await.is_authenticated());
  }

  #[test]
  fn cookie_round_trip() {
    let id = Uuid::new_v4();
    let jar = CookieJar::new().add(session_cookie(id));
    assert_eq!(session_id(&jar), Some(id));

    let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "not-a-uuid"));
    assert_eq!(session_id(&jar), None);
  }
}
