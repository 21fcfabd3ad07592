//! Person records: the two kinds of people the roster tracks.
//!
//! Interns and NSS personnel share a common set of details and differ only in
//! their kind-specific fields. The kind is an explicit enum tag; callers use
//! the capability helpers on [`Person`] rather than inspecting fields.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Storage-assigned identifier. Positive and immutable once assigned.
pub type PersonId = i64;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// Which family of records a page, endpoint, or table deals with.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
  Intern,
  Nss,
}

impl RecordKind {
  /// Human-readable plural, used for page titles.
  pub fn label(self) -> &'static str {
    match self {
      Self::Intern => "Interns",
      Self::Nss => "NSS Personnel",
    }
  }
}

// ─── Shared details ──────────────────────────────────────────────────────────

/// Fields common to both kinds of record.
///
/// Dates are kept as entered (`DD/MM/YY` or `DD/MM/YYYY`); see
/// [`crate::date::parse`] for how they are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
  pub name:        String,
  #[serde(default)]
  pub phone:       String,
  #[serde(default)]
  pub institution: String,
  #[serde(default)]
  pub course:      String,
  #[serde(default)]
  pub interest:    String,
  pub start_date:  String,
  pub end_date:    String,
}

impl PersonDetails {
  /// Reject details that storage must never accept.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(())
  }
}

// ─── Stored records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intern {
  pub id:      PersonId,
  #[serde(flatten)]
  pub details: PersonDetails,
  pub level:   u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NssPerson {
  pub id:      PersonId,
  #[serde(flatten)]
  pub details: PersonDetails,
  #[serde(rename = "nssID")]
  pub nss_id:  String,
  pub email:   String,
}

/// A stored record of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Person {
  Intern(Intern),
  Nss(NssPerson),
}

impl Person {
  pub fn id(&self) -> PersonId {
    match self {
      Self::Intern(i) => i.id,
      Self::Nss(n) => n.id,
    }
  }

  pub fn details(&self) -> &PersonDetails {
    match self {
      Self::Intern(i) => &i.details,
      Self::Nss(n) => &n.details,
    }
  }

  pub fn name(&self) -> &str { &self.details().name }

  pub fn kind(&self) -> RecordKind {
    match self {
      Self::Intern(_) => RecordKind::Intern,
      Self::Nss(_) => RecordKind::Nss,
    }
  }

  pub fn is_intern(&self) -> bool { matches!(self, Self::Intern(_)) }

  pub fn is_nss_person(&self) -> bool { matches!(self, Self::Nss(_)) }

  /// The academic level, present only on interns.
  pub fn level(&self) -> Option<u16> {
    match self {
      Self::Intern(i) => Some(i.level),
      Self::Nss(_) => None,
    }
  }

  pub fn as_intern(&self) -> Option<&Intern> {
    match self {
      Self::Intern(i) => Some(i),
      Self::Nss(_) => None,
    }
  }

  pub fn as_nss_person(&self) -> Option<&NssPerson> {
    match self {
      Self::Nss(n) => Some(n),
      Self::Intern(_) => None,
    }
  }

  /// The editable part of this record, e.g. to pre-fill an edit form.
  pub fn to_new(&self) -> NewPerson {
    match self {
      Self::Intern(i) => NewPerson::Intern(NewIntern {
        details: i.details.clone(),
        level:   i.level,
      }),
      Self::Nss(n) => NewPerson::Nss(NewNssPerson {
        details: n.details.clone(),
        nss_id:  n.nss_id.clone(),
        email:   n.email.clone(),
      }),
    }
  }
}

impl From<Intern> for Person {
  fn from(i: Intern) -> Self { Self::Intern(i) }
}

impl From<NssPerson> for Person {
  fn from(n: NssPerson) -> Self { Self::Nss(n) }
}

// ─── New records ─────────────────────────────────────────────────────────────

/// Input for creating or updating an intern. The id is never accepted from
/// callers; storage assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIntern {
  #[serde(flatten)]
  pub details: PersonDetails,
  pub level:   u16,
}

impl NewIntern {
  pub fn with_id(self, id: PersonId) -> Intern {
    Intern { id, details: self.details, level: self.level }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNssPerson {
  #[serde(flatten)]
  pub details: PersonDetails,
  #[serde(rename = "nssID")]
  pub nss_id:  String,
  pub email:   String,
}

impl NewNssPerson {
  pub fn with_id(self, id: PersonId) -> NssPerson {
    NssPerson {
      id,
      details: self.details,
      nss_id: self.nss_id,
      email: self.email,
    }
  }
}

impl From<NewIntern> for NewPerson {
  fn from(i: NewIntern) -> Self { Self::Intern(i) }
}

impl From<NewNssPerson> for NewPerson {
  fn from(n: NewNssPerson) -> Self { Self::Nss(n) }
}

/// Input to [`crate::store::PersonStore::create`] and
/// [`crate::store::PersonStore::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewPerson {
  Intern(NewIntern),
  Nss(NewNssPerson),
}

impl NewPerson {
  pub fn kind(&self) -> RecordKind {
    match self {
      Self::Intern(_) => RecordKind::Intern,
      Self::Nss(_) => RecordKind::Nss,
    }
  }

  pub fn details(&self) -> &PersonDetails {
    match self {
      Self::Intern(i) => &i.details,
      Self::Nss(n) => &n.details,
    }
  }

  pub fn validate(&self) -> Result<()> {
    self.details().validate()?;
    if let Self::Nss(n) = self
      && n.nss_id.trim().is_empty()
    {
      return Err(Error::EmptyNssId);
    }
    Ok(())
  }

  /// Attach a storage-assigned id.
  pub fn with_id(self, id: PersonId) -> Person {
    match self {
      Self::Intern(i) => Person::Intern(i.with_id(id)),
      Self::Nss(n) => Person::Nss(n.with_id(id)),
    }
  }
}
