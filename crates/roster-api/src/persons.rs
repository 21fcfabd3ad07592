//! Handlers for the `/interns` and `/nss` endpoint families.
//!
//! Both families share one set of generic handlers; the request body type
//! picks the record kind.
//!
//! | Method   | Path                  | Notes |
//! |----------|-----------------------|-------|
//! | `GET`    | `/{kind}`             | All records of the kind, in id order |
//! | `POST`   | `/{kind}`             | 201 + created record |
//! | `GET`    | `/{kind}/{id}`        | 404 if not found |
//! | `PUT`    | `/{kind}/{id}`        | Full replacement; 404 if not found |
//! | `DELETE` | `/{kind}/{id}`        | 404 if not found |
//! | `POST`   | `/{kind}/{id}/delete` | Same as `DELETE` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  person::{NewIntern, NewNssPerson, NewPerson, Person, PersonId, RecordKind},
  store::PersonStore,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::ApiError;

// ─── Record inputs ───────────────────────────────────────────────────────────

/// A request body accepted by one endpoint family.
pub trait RecordInput: DeserializeOwned + Into<NewPerson> + Send + 'static {
  const KIND: RecordKind;
  /// Singular noun used in response messages.
  const NOUN: &'static str;
}

impl RecordInput for NewIntern {
  const KIND: RecordKind = RecordKind::Intern;
  const NOUN: &'static str = "Intern";
}

impl RecordInput for NewNssPerson {
  const KIND: RecordKind = RecordKind::Nss;
  const NOUN: &'static str = "NSS person";
}

/// Body of responses that carry no record.
#[derive(Debug, Serialize)]
pub struct Message {
  pub message: String,
}

fn not_found<I: RecordInput>(id: PersonId) -> ApiError {
  ApiError::NotFound(format!("{} {id} not found", I::NOUN))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /interns` or `GET /nss`
pub async fn list<S, I>(State(store): State<Arc<S>>) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  I: RecordInput,
{
  let records = store.list(I::KIND).await.map_err(ApiError::from_store)?;
  Ok(Json(records))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /interns/{id}` or `GET /nss/{id}`
pub async fn get_one<S, I>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  I: RecordInput,
{
  let record = store
    .get(I::KIND, id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found::<I>(id))?;
  Ok(Json(record))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /interns` or `POST /nss`
pub async fn create<S, I>(
  State(store): State<Arc<S>>,
  Json(body): Json<I>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
  I: RecordInput,
{
  let input: NewPerson = body.into();
  input.validate()?;

  let record = store.create(input).await.map_err(ApiError::from_store)?;
  tracing::info!(kind = %I::KIND, id = record.id(), "record created");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /interns/{id}` or `PUT /nss/{id}`
pub async fn update<S, I>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
  Json(body): Json<I>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  I: RecordInput,
{
  let input: NewPerson = body.into();
  input.validate()?;

  let record = store
    .update(id, input)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| not_found::<I>(id))?;
  tracing::info!(kind = %I::KIND, id, "record updated");
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /interns/{id}` or `POST /interns/{id}/delete`, and the same for
/// `/nss`.
pub async fn delete<S, I>(
  State(store): State<Arc<S>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Message>, ApiError>
where
  S: PersonStore,
  I: RecordInput,
{
  if !store.delete(I::KIND, id).await.map_err(ApiError::from_store)? {
    return Err(not_found::<I>(id));
  }
  tracing::info!(kind = %I::KIND, id, "record deleted");
  Ok(Json(Message { message: format!("{} deleted", I::NOUN) }))
}
