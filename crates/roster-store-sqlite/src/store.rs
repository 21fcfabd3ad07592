//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use roster_core::{
  person::{NewPerson, Person, PersonId, RecordKind},
  store::PersonStore,
};

use crate::{
  Error, Result,
  encode::{Columns, KindColumns, RawPerson, encode_dt, select_sql, table},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome of a write that can be refused for domain reasons.
enum Write {
  Done(PersonId),
  NssIdTaken(String),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Whether another NSS record already uses `nss_id`.
fn nss_id_taken(
  conn: &rusqlite::Connection,
  nss_id: &str,
  except: Option<PersonId>,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM nss_personnel WHERE nss_id = ?1 AND id IS NOT ?2",
        rusqlite::params![nss_id, except],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn list(&self, kind: RecordKind) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", select_sql(kind)))?;
        let rows = stmt
          .query_map([], |row| RawPerson::from_row(kind, row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get(&self, kind: RecordKind, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("{} WHERE id = ?1", select_sql(kind)),
              rusqlite::params![id],
              |row| RawPerson::from_row(kind, row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn create(&self, input: NewPerson) -> Result<Person> {
    input.validate()?;

    let cols = Columns::from(&input);
    let created_at = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match &cols.extra {
          KindColumns::Intern { level } => {
            tx.execute(
              "INSERT INTO interns (
                 name, phone, institution, course, interest,
                 start_date, end_date, level, created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
              rusqlite::params![
                cols.name,
                cols.phone,
                cols.institution,
                cols.course,
                cols.interest,
                cols.start_date,
                cols.end_date,
                level,
                created_at,
              ],
            )?;
          }
          KindColumns::Nss { nss_id, email } => {
            if nss_id_taken(&tx, nss_id, None)? {
              return Ok(Write::NssIdTaken(nss_id.clone()));
            }
            tx.execute(
              "INSERT INTO nss_personnel (
                 name, phone, institution, course, interest,
                 start_date, end_date, nss_id, email, created_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
              rusqlite::params![
                cols.name,
                cols.phone,
                cols.institution,
                cols.course,
                cols.interest,
                cols.start_date,
                cols.end_date,
                nss_id,
                email,
                created_at,
              ],
            )?;
          }
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Write::Done(id))
      })
      .await?;

    match outcome {
      Write::Done(id) => {
        tracing::debug!(kind = %input.kind(), id, "created record");
        Ok(input.with_id(id))
      }
      Write::NssIdTaken(nss_id) => Err(Error::DuplicateNssId(nss_id)),
    }
  }

  async fn update(&self, id: PersonId, input: NewPerson) -> Result<Option<Person>> {
    input.validate()?;

    let cols = Columns::from(&input);
    let kind = cols.kind;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = match &cols.extra {
          KindColumns::Intern { level } => tx.execute(
            "UPDATE interns SET
               name = ?1, phone = ?2, institution = ?3, course = ?4,
               interest = ?5, start_date = ?6, end_date = ?7, level = ?8
             WHERE id = ?9",
            rusqlite::params![
              cols.name,
              cols.phone,
              cols.institution,
              cols.course,
              cols.interest,
              cols.start_date,
              cols.end_date,
              level,
              id,
            ],
          )?,
          KindColumns::Nss { nss_id, email } => {
            if nss_id_taken(&tx, nss_id, Some(id))? {
              return Ok(Some(Write::NssIdTaken(nss_id.clone())));
            }
            tx.execute(
              "UPDATE nss_personnel SET
                 name = ?1, phone = ?2, institution = ?3, course = ?4,
                 interest = ?5, start_date = ?6, end_date = ?7,
                 nss_id = ?8, email = ?9
               WHERE id = ?10",
              rusqlite::params![
                cols.name,
                cols.phone,
                cols.institution,
                cols.course,
                cols.interest,
                cols.start_date,
                cols.end_date,
                nss_id,
                email,
                id,
              ],
            )?
          }
        };
        tx.commit()?;
        Ok((changed > 0).then_some(Write::Done(id)))
      })
      .await?;

    match outcome {
      Some(Write::Done(id)) => {
        tracing::debug!(%kind, id, "updated record");
        Ok(Some(input.with_id(id)))
      }
      Some(Write::NssIdTaken(nss_id)) => Err(Error::DuplicateNssId(nss_id)),
      None => Ok(None),
    }
  }

  async fn delete(&self, kind: RecordKind, id: PersonId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!("DELETE FROM {} WHERE id = ?1", table(kind)),
          rusqlite::params![id],
        )?;
        Ok(n > 0)
      })
      .await?;

    if removed {
      tracing::debug!(%kind, id, "deleted record");
    }
    Ok(removed)
  }
}
