//! Encoding and decoding helpers between roster domain types and the plain
//! column values stored in SQLite.
//!
//! Dates on records are stored exactly as entered. `created_at` is an RFC
//! 3339 string.

use chrono::{DateTime, Utc};
use roster_core::person::{
  Intern, NewPerson, NssPerson, Person, PersonDetails, PersonId, RecordKind,
};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

pub fn table(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Intern => "interns",
    RecordKind::Nss => "nss_personnel",
  }
}

pub fn select_sql(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Intern => {
      "SELECT id, name, phone, institution, course, interest, start_date, end_date, level
       FROM interns"
    }
    RecordKind::Nss => {
      "SELECT id, name, phone, institution, course, interest, start_date, end_date, nss_id, email
       FROM nss_personnel"
    }
  }
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values shared by both tables, in `select_sql` order.
pub struct RawDetails {
  pub name:        String,
  pub phone:       String,
  pub institution: String,
  pub course:      String,
  pub interest:    String,
  pub start_date:  String,
  pub end_date:    String,
}

impl RawDetails {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:        row.get(1)?,
      phone:       row.get(2)?,
      institution: row.get(3)?,
      course:      row.get(4)?,
      interest:    row.get(5)?,
      start_date:  row.get(6)?,
      end_date:    row.get(7)?,
    })
  }

  fn into_details(self) -> PersonDetails {
    PersonDetails {
      name:        self.name,
      phone:       self.phone,
      institution: self.institution,
      course:      self.course,
      interest:    self.interest,
      start_date:  self.start_date,
      end_date:    self.end_date,
    }
  }
}

/// Raw values read from either table, before domain conversion.
pub enum RawPerson {
  Intern {
    id:      PersonId,
    details: RawDetails,
    level:   i64,
  },
  Nss {
    id:      PersonId,
    details: RawDetails,
    nss_id:  String,
    email:   String,
  },
}

impl RawPerson {
  pub fn from_row(kind: RecordKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let id = row.get(0)?;
    let details = RawDetails::from_row(row)?;
    Ok(match kind {
      RecordKind::Intern => Self::Intern { id, details, level: row.get(8)? },
      RecordKind::Nss => Self::Nss {
        id,
        details,
        nss_id: row.get(8)?,
        email: row.get(9)?,
      },
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(match self {
      Self::Intern { id, details, level } => Person::Intern(Intern {
        id,
        details: details.into_details(),
        level: u16::try_from(level).map_err(|_| Error::InvalidLevel(level))?,
      }),
      Self::Nss { id, details, nss_id, email } => Person::Nss(NssPerson {
        id,
        details: details.into_details(),
        nss_id,
        email,
      }),
    })
  }
}

/// Kind-specific column values.
pub enum KindColumns {
  Intern { level: i64 },
  Nss { nss_id: String, email: String },
}

/// Owned column values for an INSERT or UPDATE, ready to move into a
/// connection closure.
pub struct Columns {
  pub kind:        RecordKind,
  pub name:        String,
  pub phone:       String,
  pub institution: String,
  pub course:      String,
  pub interest:    String,
  pub start_date:  String,
  pub end_date:    String,
  pub extra:       KindColumns,
}

impl From<&NewPerson> for Columns {
  fn from(input: &NewPerson) -> Self {
    let d = input.details().clone();
    let extra = match input {
      NewPerson::Intern(i) => KindColumns::Intern { level: i64::from(i.level) },
      NewPerson::Nss(n) => KindColumns::Nss {
        nss_id: n.nss_id.clone(),
        email:  n.email.clone(),
      },
    };
    Self {
      kind: input.kind(),
      name: d.name,
      phone: d.phone,
      institution: d.institution,
      course: d.course,
      interest: d.interest,
      start_date: d.start_date,
      end_date: d.end_date,
      extra,
    }
  }
}
