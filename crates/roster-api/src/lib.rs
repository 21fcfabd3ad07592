//! JSON REST API for the roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::PersonStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(roster_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::{
  person::{NewIntern, NewNssPerson},
  store::PersonStore,
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    // Interns
    .route(
      "/interns",
      get(persons::list::<S, NewIntern>).post(persons::create::<S, NewIntern>),
    )
    .route(
      "/interns/{id}",
      get(persons::get_one::<S, NewIntern>)
        .put(persons::update::<S, NewIntern>)
        .delete(persons::delete::<S, NewIntern>),
    )
    .route("/interns/{id}/delete", post(persons::delete::<S, NewIntern>))
    // NSS personnel
    .route(
      "/nss",
      get(persons::list::<S, NewNssPerson>).post(persons::create::<S, NewNssPerson>),
    )
    .route(
      "/nss/{id}",
      get(persons::get_one::<S, NewNssPerson>)
        .put(persons::update::<S, NewNssPerson>)
        .delete(persons::delete::<S, NewNssPerson>),
    )
    .route("/nss/{id}/delete", post(persons::delete::<S, NewNssPerson>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
