//! Signup, login, logout and session introspection.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/signup` | Body: [`CredentialsBody`]; 201, 400 or 409 |
//! | `POST` | `/auth/login`  | Body: [`CredentialsBody`]; sets the session cookie |
//! | `POST` | `/auth/logout` | 204; the session is discarded |
//! | `GET`  | `/auth/me`     | `{"authenticated": bool, "user": string?}` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use inspecta_api::ApiError;
use inspecta_core::store::CredentialStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
  AppState,
  session::{CurrentSession, clear_session_cookie, session_cookie},
};

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Me {
  pub authenticated: bool,
  pub user:          Option<String>,
}

/// `POST /auth/signup`: creates the account but does not log in.
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CredentialStore + Clone + 'static,
{
  state
    .store
    .register(&body.username, &body.password)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(json!({ "username": body.username }))))
}

/// `POST /auth/login`
///
/// A wrong password leaves the caller's session exactly as it was. A
/// successful login always issues a new session id.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  current: CurrentSession,
  jar: CookieJar,
  Json(body): Json<CredentialsBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CredentialStore + Clone + 'static,
{
  let valid = state
    .store
    .verify(&body.username, &body.password)
    .await
    .map_err(ApiError::store)?;

  if !valid {
    tracing::info!(username = %body.username, "login rejected");
    return Err(ApiError::Unauthorized("invalid credentials".to_owned()));
  }

  let id = state.sessions.login(current.id, &body.username).await;
  tracing::info!(username = %body.username, "logged in");

  let jar = jar.add(session_cookie(id));
  Ok((jar, Json(Me { authenticated: true, user: Some(body.username) })))
}

/// `POST /auth/logout`
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  current: CurrentSession,
  jar: CookieJar,
) -> impl IntoResponse
where
  S: Clone + Send + Sync + 'static,
{
  if let Some(id) = current.id {
    state.sessions.logout(id).await;
  }
  if let Some(user) = current.session.current_user() {
    tracing::info!(%user, "logged out");
  }
  (jar.remove(clear_session_cookie()), StatusCode::NO_CONTENT)
}

/// `GET /auth/me`
pub async fn me(current: CurrentSession) -> Json<Me> {
  Json(Me {
    authenticated: current.session.is_authenticated(),
    user:          current.session.current_user().map(str::to_owned),
  })
}
