//! Per-client authentication state.
//!
//! A session starts [`Session::Anonymous`] and only moves to
//! [`Session::Authenticated`] after the credential store has verified a
//! password. Nothing here is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum Session {
  #[default]
  Anonymous,
  Authenticated(String),
}

impl Session {
  pub fn is_authenticated(&self) -> bool { matches!(self, Self::Authenticated(_)) }

  pub fn current_user(&self) -> Option<&str> {
    match self {
      Session::Anonymous => None,
      Session::Authenticated(user) => Some(user.as_str()),
    }
  }

  /// Record a successful login. Callers must have verified the password.
  pub fn login(&mut self, user: impl Into<String>) { *self = Session::Authenticated(user.into()); }

  pub fn logout(&mut self) { *self = Session::Anonymous; }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_anonymous() {
    let s = Session::default();
    assert!(!s.is_authenticated());
    assert_eq!(s.current_user(), None);
  }

  #[test]
  fn login_then_logout() {
    let mut s = Session::default();
    s.login("alice");
    assert!(s.is_authenticated());
    assert_eq!(s.current_user(), Some("alice"));

    s.logout();
    assert_eq!(s, Session::Anonymous);
  }

  #[test]
  fn relogin_switches_user() {
    let mut s = Session::default();
    s.login("alice");
    s.login("bob");
    assert_eq!(s.current_user(), Some("bob"));
  }
}
