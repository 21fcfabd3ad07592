//! HTTP server for the roster.
//!
//! Mounts the [`roster_api`] person endpoints behind session or Basic
//! authentication, plus the `/auth` routes that manage sessions.

pub mod auth;
pub mod error;
pub mod session;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  middleware,
  routing::{get, post},
};
use chrono::TimeDelta;
use roster_core::store::PersonStore;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use auth::AuthConfig;
use session::SessionTable;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub auth_username:       String,
  pub auth_password_hash:  String,
  pub session_ttl_minutes: u32,
  /// Origins allowed to make credentialed cross-origin requests. Empty means
  /// any origin, without credentials.
  pub allowed_origins:     Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                8080,
      store_path:          PathBuf::from("~/.local/share/roster/roster.db"),
      auth_username:       "admin".to_string(),
      auth_password_hash:  String::new(),
      session_ttl_minutes: 480,
      allowed_origins:     Vec::new(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the auth routes and middleware.
#[derive(Clone)]
pub struct AppState<S: PersonStore> {
  pub store:    Arc<S>,
  pub config:   Arc<ServerConfig>,
  pub auth:     Arc<AuthConfig>,
  pub sessions: Arc<SessionTable>,
}

impl<S: PersonStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      auth:     Arc::new(AuthConfig {
        username:      config.auth_username.clone(),
        password_hash: config.auth_password_hash.clone(),
      }),
      sessions: Arc::new(SessionTable::new(TimeDelta::minutes(i64::from(
        config.session_ttl_minutes,
      )))),
      config:   Arc::new(config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PersonStore + Clone + 'static,
{
  let persons = roster_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_auth::<S>),
  );

  Router::new()
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/check", get(auth::check::<S>))
    .with_state(state.clone())
    .merge(persons)
    .layer(cors_layer(&state.config.allowed_origins))
    .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
  let cors = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
    .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .max_age(Duration::from_secs(3600));

  if allowed_origins.is_empty() {
    tracing::info!("CORS: allowing any origin without credentials");
    return cors.allow_origin(Any);
  }

  let origins: Vec<HeaderValue> = allowed_origins
    .iter()
    .filter_map(|o| match o.parse() {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
        None
      }
    })
    .collect();
  tracing::info!(?allowed_origins, "CORS: allowing configured origins");
  cors.allow_origin(origins).allow_credentials(true)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState::new(store, ServerConfig {
      store_path:         PathBuf::from(":memory:"),
      auth_username:      "admin".to_string(),
      auth_password_hash: hash,
      ..ServerConfig::default()
    })
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
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

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn session_token(resp: &Response) -> String {
    let set = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set
      .split(';')
      .next()
      .and_then(|kv| kv.strip_prefix("roster_session="))
      .unwrap()
      .to_string()
  }

  fn intern() -> Value {
    json!({
      "name": "Ama",
      "startDate": "01/02/25",
      "endDate": "31/08/25",
      "level": 100,
    })
  }

  // ── Protection ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn person_endpoints_require_auth() {
    let state = make_state("secret").await;
    let resp = oneshot_raw(state, "GET", "/interns", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(json_body(resp).await["error"], "authentication required");
  }

  #[tokio::test]
  async fn basic_auth_reaches_person_endpoints() {
    let state = make_state("secret").await;
    let auth  = basic("admin", "secret");

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/interns",
      vec![(header::AUTHORIZATION, auth.as_str())],
      Some(intern()),
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot_raw(
      state,
      "GET",
      "/interns",
      vec![(header::AUTHORIZATION, auth.as_str())],
      None,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn wrong_basic_password_is_rejected() {
    let state = make_state("secret").await;
    let auth  = basic("admin", "nope");
    let resp  = oneshot_raw(state, "GET", "/nss", vec![(header::AUTHORIZATION, auth.as_str())], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Sessions ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_sets_cookie_and_session_authenticates() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(
      state.clone(),
      "POST",
      "/auth/login",
      vec![],
      Some(json!({ "username": "admin", "password": "secret" })),
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(set.contains("HttpOnly"));
    let cookie = format!("roster_session={}", session_token(&resp));

    let resp = oneshot_raw(
      state.clone(),
      "GET",
      "/auth/check",
      vec![(header::COOKIE, cookie.as_str())],
      None,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "authenticated": true }));

    let resp = oneshot_raw(state, "GET", "/nss", vec![(header::COOKIE, cookie.as_str())], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn bad_login_is_401_without_cookie() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(
      state,
      "POST",
      "/auth/login",
      vec![],
      Some(json!({ "username": "admin", "password": "guess" })),
    ).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());
    assert!(!resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn check_without_session_is_401() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(state, "GET", "/auth/check", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn logout_ends_session_and_expires_cookie() {
    let state = make_state("secret").await;
    let resp  = oneshot_raw(
      state.clone(),
      "POST",
      "/auth/login",
      vec![],
      Some(json!({ "username": "admin", "password": "secret" })),
    ).await;
    let cookie = format!("roster_session={}", session_token(&resp));

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/auth/logout",
      vec![(header::COOKIE, cookie.as_str())],
      None,
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let set = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set.contains("Max-Age=0"));

    let resp = oneshot_raw(state, "GET", "/interns", vec![(header::COOKIE, cookie.as_str())], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Errors pass through ──────────────────────────────────────────────────

  #[tokio::test]
  async fn validation_errors_keep_their_status() {
    let state = make_state("secret").await;
    let auth  = basic("admin", "secret");
    let resp  = oneshot_raw(
      state,
      "POST",
      "/interns",
      vec![(header::AUTHORIZATION, auth.as_str())],
      Some(json!({ "name": " ", "startDate": "", "endDate": "", "level": 100 })),
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
