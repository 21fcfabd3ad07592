//! Active/completed classification.
//!
//! A person is active while the current moment lies within their start and
//! end dates, both ends inclusive. Everything else is completed, including
//! people whose placement has not started yet.

use std::{convert::Infallible, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{date, person::Person};

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of "now" for status derivation.
pub trait Clock {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Status filter selection. `All` places no constraint, and is what any
/// unrecognised text parses to.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
  #[default]
  All,
  Active,
  Completed,
}

impl FromStr for Status {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.trim() {
      "active" => Self::Active,
      "completed" => Self::Completed,
      _ => Self::All,
    })
  }
}

impl From<String> for Status {
  fn from(s: String) -> Self {
    let Ok(status) = s.parse();
    status
  }
}

impl Status {
  /// Whether a record with the given activeness satisfies this selection.
  pub fn admits(self, active: bool) -> bool {
    match self {
      Self::All => true,
      Self::Active => active,
      Self::Completed => !active,
    }
  }
}

/// `start <= now <= end`. An unparseable start or end date is never active.
pub fn is_active(person: &Person, now: DateTime<Utc>) -> bool {
  let details = person.details();
  let start = date::parse(&details.start_date);
  let end = date::parse(&details.end_date);
  start <= now && end >= now
}
