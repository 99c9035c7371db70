//! Shared admin session state.
//!
//! One [`AdminSession`] is created at startup and handed to every clone of
//! the client. When any request comes back 401 the session is invalidated
//! in place, so concurrent tasks (poller, alert feed, foreground actions)
//! all observe the logout at their next request instead of retrying a dead
//! token forever.

use std::sync::{Arc, RwLock};

/// Cheap-to-clone handle on the current bearer token.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
  token: Arc<RwLock<Option<String>>>,
}

impl AdminSession {
  /// A session holding a bearer token.
  pub fn with_token(token: impl Into<String>) -> Self {
    Self { token: Arc::new(RwLock::new(Some(token.into()))) }
  }

  /// A session with no credentials. Requests go out without an
  /// `Authorization` header; the backend decides what that may see.
  pub fn anonymous() -> Self {
    Self::default()
  }

  /// The current token, if the session is still live.
  pub fn token(&self) -> Option<String> {
    match self.token.read() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }

  pub fn is_authenticated(&self) -> bool {
    self.token().is_some()
  }

  /// Drop the token. Idempotent.
  pub fn invalidate(&self) {
    match self.token.write() {
      Ok(mut guard) => *guard = None,
      Err(poisoned) => *poisoned.into_inner() = None,
    }
  }
}
