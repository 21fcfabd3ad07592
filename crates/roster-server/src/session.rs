//! In-memory login sessions.
//!
//! A session is an opaque random token mapped to its expiry instant. Sessions
//! do not survive a restart.

use std::collections::HashMap;

use axum::http::{HeaderMap, header};
use chrono::{DateTime, TimeDelta, Utc};
use rand_core::{OsRng, RngCore as _};
use tokio::sync::Mutex;

/// Name of the cookie carrying the session token.
pub const COOKIE_NAME: &str = "roster_session";

const TOKEN_BYTES: usize = 32;

pub struct SessionTable {
  ttl:      TimeDelta,
  sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionTable {
  pub fn new(ttl: TimeDelta) -> Self {
    Self { ttl, sessions: Mutex::new(HashMap::new()) }
  }

  pub fn ttl(&self) -> TimeDelta { self.ttl }

  /// Start a session and return its token.
  pub async fn create(&self) -> String { self.create_at(Utc::now()).await }

  /// Start a session at `now`, pruning any sessions already expired.
  pub async fn create_at(&self, now: DateTime<Utc>) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    let mut sessions = self.sessions.lock().await;
    let before = sessions.len();
    sessions.retain(|_, expires| *expires > now);
    if sessions.len() < before {
      tracing::debug!(pruned = before - sessions.len(), "expired sessions pruned");
    }
    sessions.insert(token.clone(), now + self.ttl);
    token
  }

  /// Whether `token` names a live session. An expired session is dropped.
  pub async fn is_valid(&self, token: &str) -> bool { self.is_valid_at(token, Utc::now()).await }

  pub async fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
    let mut sessions = self.sessions.lock().await;
    match sessions.get(token).copied() {
      Some(expires) if expires > now => true,
      Some(_) => {
        sessions.remove(token);
        tracing::debug!("expired session dropped");
        false
      }
      None => false,
    }
  }

  /// End a session. Returns `false` if it was not live.
  pub async fn remove(&self, token: &str) -> bool {
    self.sessions.lock().await.remove(token).is_some()
  }

  pub async fn count(&self) -> usize { self.sessions.lock().await.len() }
}

// ─── Cookies ─────────────────────────────────────────────────────────────────

/// The session token from a request's `Cookie` headers, if present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == COOKIE_NAME)
    .map(|(_, value)| value.to_string())
    .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, ttl: TimeDelta) -> String {
  format!(
    "{COOKIE_NAME}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
    ttl.num_seconds()
  )
}

/// `Set-Cookie` value telling the client to forget its session.
pub fn expired_cookie() -> String {
  format!("{COOKIE_NAME}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
