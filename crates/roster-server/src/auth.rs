//! Credential checks, the auth routes, and the middleware guarding the
//! person endpoints.
//!
//! A request is authenticated by either a live `roster_session` cookie or
//! HTTP Basic credentials matching the configured user.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use roster_core::store::PersonStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
  AppState,
  error::Error,
  session::{self, expired_cookie, session_cookie},
};

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Check a username and password against the configured credential.
pub fn verify_credentials(config: &AuthConfig, username: &str, password: &str) -> bool {
  if username != config.username {
    return false;
  }
  let Ok(parsed_hash) = PasswordHash::new(&config.password_hash) else {
    tracing::warn!("configured password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .is_ok()
}

/// Verify HTTP Basic credentials directly from headers.
pub fn verify_basic(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  if verify_credentials(config, username, password) {
    Ok(())
  } else {
    Err(Error::Unauthorized)
  }
}

/// Accept a live session cookie, falling back to Basic credentials.
pub async fn authenticate<S>(headers: &HeaderMap, state: &AppState<S>) -> Result<(), Error>
where
  S: PersonStore,
{
  if let Some(token) = session::token_from_headers(headers)
    && state.sessions.is_valid(&token).await
  {
    return Ok(());
  }
  verify_basic(headers, &state.auth)
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Reject unauthenticated requests before they reach the person endpoints.
pub async fn require_auth<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: PersonStore,
{
  authenticate(req.headers(), &state).await?;
  Ok(next.run(req).await)
}

// ─── Routes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Message {
  pub message: String,
}

fn with_cookie(body: impl IntoResponse, cookie: &str) -> Response {
  let mut res = body.into_response();
  if let Ok(value) = HeaderValue::from_str(cookie) {
    res.headers_mut().insert(header::SET_COOKIE, value);
  }
  res
}

/// `POST /auth/login`: body: `{"username":"…","password":"…"}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Response, Error>
where
  S: PersonStore,
{
  if !verify_credentials(&state.auth, &body.username, &body.password) {
    tracing::info!(username = %body.username, "login rejected");
    return Err(Error::InvalidCredentials);
  }

  let token = state.sessions.create().await;
  tracing::info!(username = %body.username, "login accepted");
  Ok(with_cookie(
    Json(Message { message: "Login successful".into() }),
    &session_cookie(&token, state.sessions.ttl()),
  ))
}

/// `POST /auth/logout`: always succeeds and clears the cookie.
pub async fn logout<S>(State(state): State<AppState<S>>, headers: HeaderMap) -> Response
where
  S: PersonStore,
{
  if let Some(token) = session::token_from_headers(&headers)
    && state.sessions.remove(&token).await
  {
    tracing::info!("session ended");
  }
  with_cookie(
    Json(Message { message: "Logged out".into() }),
    &expired_cookie(),
  )
}

/// `GET /auth/check`
pub async fn check<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<Json<serde_json::Value>, Error>
where
  S: PersonStore,
{
  authenticate(&headers, &state).await?;
  Ok(Json(json!({ "authenticated": true })))
}
