//! Name search.
//!
//! Search terms are escaped before being compiled as a case-insensitive
//! regex, so ordinary input behaves like substring search. If compilation
//! fails (size limits, odd input) the match degrades to a lowercase
//! `contains` check. Matching never fails.

use regex::RegexBuilder;

use crate::person::{Person, RecordKind};

/// Which fields of a record a search term is tried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
  Name,
  NameAndInstitution,
}

impl SearchScope {
  /// NSS pages also search by institution; intern pages search names only.
  pub fn for_kind(kind: RecordKind) -> Self {
    match kind {
      RecordKind::Intern => Self::Name,
      RecordKind::Nss => Self::NameAndInstitution,
    }
  }
}

/// A compiled search term, reusable across many records.
#[derive(Debug, Clone)]
pub enum Matcher {
  /// Blank term: everything matches.
  Any,
  Pattern(regex::Regex),
  /// Lowercased term for the substring fallback.
  Substring(String),
}

impl Matcher {
  pub fn new(term: &str) -> Self {
    if term.trim().is_empty() {
      return Self::Any;
    }
    match RegexBuilder::new(&regex::escape(term))
      .case_insensitive(true)
      .build()
    {
      Ok(re) => Self::Pattern(re),
      Err(_) => Self::Substring(term.to_lowercase()),
    }
  }

  pub fn is_match(&self, haystack: &str) -> bool {
    match self {
      Self::Any => true,
      Self::Pattern(re) => re.is_match(haystack),
      Self::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
    }
  }

  pub fn matches_person(&self, person: &Person, scope: SearchScope) -> bool {
    let details = person.details();
    self.is_match(&details.name)
      || (scope == SearchScope::NameAndInstitution && self.is_match(&details.institution))
  }
}

/// One-shot search over a person's name (and institution, per `scope`).
pub fn matches(person: &Person, term: &str, scope: SearchScope) -> bool {
  Matcher::new(term).matches_person(person, scope)
}
