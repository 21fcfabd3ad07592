//! Day/month/year date parsing.
//!
//! Records carry their start and end dates as text in `D/M/Y` order with a 2-
//! or 4-digit year. Parsing never fails: malformed input produces an invalid
//! [`Timestamp`] that is unordered with respect to every other timestamp.
//!
//! Day and month are not range-checked. They roll over the calendar the way a
//! lenient date constructor does, so `32/01/25` is the 1st of February and
//! `31/02/25` is the 3rd of March.

use std::cmp::Ordering;

use chrono::{DateTime, Months, NaiveDate, TimeDelta, Utc};

// ─── Timestamp ───────────────────────────────────────────────────────────────

/// A comparable point in time, or the invalid sentinel.
///
/// Comparisons follow floating-point NaN rules: an invalid timestamp is not
/// equal to anything (itself included) and every `<`, `<=`, `>`, `>=` against
/// it is `false`.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
  pub const INVALID: Self = Self(None);

  pub fn at(instant: DateTime<Utc>) -> Self { Self(Some(instant)) }

  pub fn is_valid(&self) -> bool { self.0.is_some() }

  pub fn instant(&self) -> Option<DateTime<Utc>> { self.0 }
}

impl From<DateTime<Utc>> for Timestamp {
  fn from(instant: DateTime<Utc>) -> Self { Self::at(instant) }
}

impl PartialEq for Timestamp {
  fn eq(&self, other: &Self) -> bool {
    matches!((self.0, other.0), (Some(a), Some(b)) if a == b)
  }
}

impl PartialOrd for Timestamp {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self.0, other.0) {
      (Some(a), Some(b)) => Some(a.cmp(&b)),
      _ => None,
    }
  }
}

impl PartialEq<DateTime<Utc>> for Timestamp {
  fn eq(&self, other: &DateTime<Utc>) -> bool { *self == Timestamp::at(*other) }
}

impl PartialOrd<DateTime<Utc>> for Timestamp {
  fn partial_cmp(&self, other: &DateTime<Utc>) -> Option<Ordering> {
    self.partial_cmp(&Timestamp::at(*other))
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a `D/M/Y` date. A 2-digit year is read as `20YY`.
///
/// Extra `/`-separated fields after the year are ignored. Missing or
/// non-numeric fields give [`Timestamp::INVALID`].
pub fn parse(text: &str) -> Timestamp {
  let mut parts = text.split('/').map(str::trim);
  let (Some(day), Some(month), Some(year)) = (parts.next(), parts.next(), parts.next())
  else {
    return Timestamp::INVALID;
  };

  let year = if year.len() == 2 {
    format!("20{year}")
  } else {
    year.to_owned()
  };

  match (number(day), number(month), number(&year)) {
    (Some(d), Some(m), Some(y)) => from_parts(y, m, d),
    _ => Timestamp::INVALID,
  }
}

/// Parse a minimum-date filter boundary.
///
/// Date pickers emit ISO `YYYY-MM-DD`; that form is accepted here in addition
/// to everything [`parse`] accepts.
pub fn parse_boundary(text: &str) -> Timestamp {
  let trimmed = text.trim();
  if !trimmed.contains('/') {
    let mut parts = trimmed.split('-');
    if let (Some(y), Some(m), Some(d), None) =
      (parts.next(), parts.next(), parts.next(), parts.next())
      && let (Some(y), Some(m), Some(d)) = (number(y), number(m), number(d))
    {
      return from_parts(y, m, d);
    }
  }
  parse(trimmed)
}

/// Build a timestamp for midnight UTC, rolling day and month over the
/// calendar instead of rejecting them.
pub fn from_parts(year: i64, month: i64, day: i64) -> Timestamp {
  Timestamp(
    rolled_date(year, month, day)
      .and_then(|d| d.and_hms_opt(0, 0, 0))
      .map(|dt| dt.and_utc()),
  )
}

fn rolled_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
  let base = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)?;

  let months = month.checked_sub(1)?;
  let shifted = if months >= 0 {
    base.checked_add_months(Months::new(u32::try_from(months).ok()?))?
  } else {
    base.checked_sub_months(Months::new(u32::try_from(-months).ok()?))?
  };

  shifted.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
}

fn number(part: &str) -> Option<i64> {
  if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  part.parse().ok()
}
