//! The filter engine: search, predicates, then sort, plus population counts.
//!
//! Everything here is a pure function of its inputs. The `*_at` variants take
//! the instant used for status derivation explicitly; the plain variants use
//! the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  filter::{FilterConfig, Predicates},
  person::Person,
  sort,
  status::{self, Clock as _, SystemClock},
};

/// Totals shown on the status filter chips. Always computed over the full,
/// unfiltered record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
  pub all:       usize,
  pub active:    usize,
  pub completed: usize,
}

/// Filter `records` by `config`, then order them by `config.order_by`.
pub fn apply_at(records: &[Person], config: &FilterConfig, now: DateTime<Utc>) -> Vec<Person> {
  let predicates = Predicates::new(config, now);
  let filtered = records
    .iter()
    .filter(|p| predicates.include(p))
    .cloned()
    .collect();
  sort::sort_owned(filtered, config.order_by)
}

pub fn apply(records: &[Person], config: &FilterConfig) -> Vec<Person> {
  apply_at(records, config, SystemClock.now())
}

/// Count all, active, and completed records.
pub fn counts_at(records: &[Person], now: DateTime<Utc>) -> FilterCounts {
  let active = records.iter().filter(|p| status::is_active(p, now)).count();
  FilterCounts {
    all: records.len(),
    active,
    completed: records.len() - active,
  }
}

pub fn counts(records: &[Person]) -> FilterCounts { counts_at(records, SystemClock.now()) }
