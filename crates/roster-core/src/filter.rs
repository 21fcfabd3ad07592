//! Filter configuration and the per-record inclusion test.

use std::{convert::Infallible, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::{
  date,
  person::Person,
  search::{Matcher, SearchScope},
  status::{self, Status},
};

/// Academic levels offered by the level filter.
pub const LEVELS: [u16; 4] = [100, 200, 300, 400];

// ─── Order ───────────────────────────────────────────────────────────────────

/// Sort selection. The legacy `createdAt*` spellings are accepted on input;
/// anything unrecognised leaves records unordered.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(from = "String")]
pub enum OrderBy {
  #[default]
  #[serde(rename = "")]
  #[strum(to_string = "")]
  Unordered,
  #[serde(rename = "newest-first")]
  #[strum(to_string = "newest-first")]
  NewestFirst,
  #[serde(rename = "oldest-first")]
  #[strum(to_string = "oldest-first")]
  OldestFirst,
}

impl FromStr for OrderBy {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.trim() {
      "newest-first" | "createdAtDesc" => Self::NewestFirst,
      "oldest-first" | "createdAtAsc" => Self::OldestFirst,
      _ => Self::Unordered,
    })
  }
}

impl From<String> for OrderBy {
  fn from(s: String) -> Self {
    let Ok(order) = s.parse();
    order
  }
}

// ─── Interest categories ─────────────────────────────────────────────────────

/// The fixed interest categories and the keywords each one matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum InterestCategory {
  Database,
  WebDev,
  Networking,
  CyberSecurity,
  Hardware,
}

impl InterestCategory {
  pub fn keywords(self) -> &'static [&'static str] {
    match self {
      Self::Database => &["database", "data science", "data"],
      Self::WebDev => &["web", "development", "frontend", "backend"],
      Self::Networking => &["networking", "network"],
      Self::CyberSecurity => &["cyber", "security"],
      Self::Hardware => &["hardware"],
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Database => "Database/Data science",
      Self::WebDev => "Web development",
      Self::Networking => "Networking",
      Self::CyberSecurity => "Cyber Security",
      Self::Hardware => "Hardware",
    }
  }

  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }
}

/// Keywords for an interest filter key. Unknown keys match themselves.
pub fn interest_keywords(key: &str) -> Vec<String> {
  match key.parse::<InterestCategory>() {
    Ok(category) => category.keywords().iter().map(|k| (*k).to_owned()).collect(),
    Err(_) => vec![key.to_lowercase()],
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// The complete set of user-selected criteria applied to produce a view.
///
/// Empty strings mean "no constraint". The value is replaced wholesale on
/// every change; nothing mutates it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
  pub status:      Status,
  pub order_by:    OrderBy,
  pub level:       String,
  pub institution: String,
  pub interest:    String,
  pub date:        String,
  pub search_term: String,
}

impl FilterConfig {
  /// Whether any criterion (sort order aside) narrows the view.
  pub fn is_narrowing(&self) -> bool {
    self.status != Status::All
      || !self.level.is_empty()
      || !self.institution.is_empty()
      || !self.interest.is_empty()
      || !self.date.is_empty()
      || !self.search_term.trim().is_empty()
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// A single structural criterion. [`Predicates`] evaluates them in the order
/// of [`Predicate::ORDER`]; the result does not depend on that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
  Status,
  Level,
  Institution,
  Interest,
  Date,
}

impl Predicate {
  pub const ORDER: [Self; 5] =
    [Self::Status, Self::Level, Self::Institution, Self::Interest, Self::Date];
}

/// A [`FilterConfig`] prepared for evaluation against many records: the
/// search term is compiled and the keyword set and date boundary resolved
/// once.
#[derive(Debug, Clone)]
pub struct Predicates<'a> {
  config:   &'a FilterConfig,
  now:      DateTime<Utc>,
  matcher:  Matcher,
  keywords: Vec<String>,
  boundary: date::Timestamp,
}

impl<'a> Predicates<'a> {
  pub fn new(config: &'a FilterConfig, now: DateTime<Utc>) -> Self {
    let keywords = if config.interest.is_empty() {
      Vec::new()
    } else {
      interest_keywords(&config.interest)
    };
    Self {
      config,
      now,
      matcher: Matcher::new(&config.search_term),
      keywords,
      boundary: date::parse_boundary(&config.date),
    }
  }

  /// Search first, then each structural predicate; stops at the first miss.
  pub fn include(&self, person: &Person) -> bool {
    self.matches_search(person) && Predicate::ORDER.iter().all(|p| self.check(*p, person))
  }

  pub fn matches_search(&self, person: &Person) -> bool {
    self
      .matcher
      .matches_person(person, SearchScope::for_kind(person.kind()))
  }

  pub fn check(&self, predicate: Predicate, person: &Person) -> bool {
    let details = person.details();
    match predicate {
      Predicate::Status => {
        self.config.status == Status::All
          || self.config.status.admits(status::is_active(person, self.now))
      }
      // Records without a level are never subject to the level filter.
      Predicate::Level => match person.level() {
        Some(level) if !self.config.level.is_empty() => level.to_string() == self.config.level,
        _ => true,
      },
      Predicate::Institution => {
        self.config.institution.is_empty() || details.institution == self.config.institution
      }
      Predicate::Interest => {
        if self.keywords.is_empty() {
          return true;
        }
        let interest = details.interest.to_lowercase();
        self.keywords.iter().any(|k| interest.contains(k.as_str()))
      }
      Predicate::Date => {
        self.config.date.is_empty() || date::parse(&details.start_date) >= self.boundary
      }
    }
  }
}

/// Whether `person` passes every criterion in `config`.
pub fn include(person: &Person, config: &FilterConfig, now: DateTime<Utc>) -> bool {
  Predicates::new(config, now).include(person)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use proptest::prelude::*;

  use super::*;
  use crate::person::{NewIntern, NewNssPerson, PersonDetails};

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap() }

  fn details(name: &str, institution: &str, interest: &str, start: &str, end: &str) -> PersonDetails {
    PersonDetails {
      name: name.into(),
      institution: institution.into(),
      interest: interest.into(),
      start_date: start.into(),
      end_date: end.into(),
      ..Default::default()
    }
  }

  fn intern(id: i64, level: u16, d: PersonDetails) -> Person {
    Person::Intern(NewIntern { details: d, level }.with_id(id))
  }

  fn nss(id: i64, d: PersonDetails) -> Person {
    Person::Nss(
      NewNssPerson { details: d, nss_id: format!("N-{id}"), email: String::new() }.with_id(id),
    )
  }

  #[test]
  fn default_config_includes_everything() {
    let cfg = FilterConfig::default();
    let p = intern(1, 100, details("Ama", "UG", "", "bad", "bad"));
    assert!(include(&p, &cfg, now()));
    assert!(!cfg.is_narrowing());
  }

  #[test]
  fn level_matches_string_form() {
    let cfg = FilterConfig { level: "200".into(), ..Default::default() };
    assert!(include(&intern(1, 200, details("A", "", "", "", "")), &cfg, now()));
    assert!(!include(&intern(2, 300, details("B", "", "", "", "")), &cfg, now()));
  }

  #[test]
  fn level_filter_never_applies_to_nss_records() {
    let p = nss(1, details("Esi", "UG", "", "01/01/25", "31/12/25"));
    for level in LEVELS {
      let cfg = FilterConfig { level: level.to_string(), ..Default::default() };
      assert!(include(&p, &cfg, now()));
    }
  }

  #[test]
  fn institution_is_exact() {
    let cfg = FilterConfig { institution: "University of Ghana".into(), ..Default::default() };
    assert!(include(&intern(1, 100, details("A", "University of Ghana", "", "", "")), &cfg, now()));
    assert!(!include(&intern(2, 100, details("B", "university of ghana", "", "", "")), &cfg, now()));
    assert!(!include(&intern(3, 100, details("C", "University of Ghana ", "", "", "")), &cfg, now()));
  }

  #[test]
  fn interest_uses_keyword_groups() {
    let cfg = FilterConfig { interest: "web-dev".into(), ..Default::default() };
    assert!(include(&intern(1, 100, details("A", "", "Frontend Engineering", "", "")), &cfg, now()));
    assert!(include(&intern(2, 100, details("B", "", "Backend APIs", "", "")), &cfg, now()));
    assert!(!include(&intern(3, 100, details("C", "", "Hardware repair", "", "")), &cfg, now()));

    let cfg = FilterConfig { interest: "database".into(), ..Default::default() };
    assert!(include(&intern(4, 100, details("D", "", "Big Data", "", "")), &cfg, now()));
  }

  #[test]
  fn unknown_interest_key_matches_literally() {
    let cfg = FilterConfig { interest: "Robotics".into(), ..Default::default() };
    assert!(include(&intern(1, 100, details("A", "", "robotics club", "", "")), &cfg, now()));
    assert!(!include(&intern(2, 100, details("B", "", "web", "", "")), &cfg, now()));
  }

  #[test]
  fn interest_keywords_table() {
    assert_eq!(interest_keywords("cyber-security"), vec!["cyber", "security"]);
    assert_eq!(interest_keywords("networking"), vec!["networking", "network"]);
    assert_eq!(interest_keywords("Quantum"), vec!["quantum"]);
    assert_eq!(InterestCategory::all().count(), 5);
  }

  #[test]
  fn date_is_a_minimum_start() {
    let cfg = FilterConfig { date: "2025-03-01".into(), ..Default::default() };
    assert!(include(&intern(1, 100, details("A", "", "", "01/03/25", "")), &cfg, now()));
    assert!(include(&intern(2, 100, details("B", "", "", "02/03/25", "")), &cfg, now()));
    assert!(!include(&intern(3, 100, details("C", "", "", "28/02/25", "")), &cfg, now()));
    assert!(!include(&intern(4, 100, details("D", "", "", "garbage", "")), &cfg, now()));
  }

  #[test]
  fn invalid_date_boundary_excludes_everything() {
    let cfg = FilterConfig { date: "not a date".into(), ..Default::default() };
    assert!(!include(&intern(1, 100, details("A", "", "", "01/03/25", "")), &cfg, now()));
  }

  #[test]
  fn status_filters() {
    let active = intern(1, 100, details("A", "", "", "01/01/25", "31/12/25"));
    let done = intern(2, 100, details("B", "", "", "01/01/24", "31/12/24"));
    let upcoming = intern(3, 100, details("C", "", "", "01/01/26", "31/12/26"));

    let only_active = FilterConfig { status: Status::Active, ..Default::default() };
    let only_completed = FilterConfig { status: Status::Completed, ..Default::default() };

    assert!(include(&active, &only_active, now()));
    assert!(!include(&done, &only_active, now()));
    assert!(!include(&active, &only_completed, now()));
    assert!(include(&done, &only_completed, now()));
    assert!(include(&upcoming, &only_completed, now()));
  }

  #[test]
  fn nss_search_covers_institution() {
    let cfg = FilterConfig { search_term: "ashesi".into(), ..Default::default() };
    assert!(include(&nss(1, details("Esi", "Ashesi University", "", "", "")), &cfg, now()));
    assert!(!include(&intern(2, 100, details("Ama", "Ashesi University", "", "", "")), &cfg, now()));
  }

  #[test]
  fn config_wire_shape() {
    let cfg: FilterConfig = serde_json::from_str(
      r#"{"status":"active","orderBy":"createdAtDesc","level":"200","searchTerm":"kw"}"#,
    )
    .unwrap();
    assert_eq!(cfg.status, Status::Active);
    assert_eq!(cfg.order_by, OrderBy::NewestFirst);
    assert_eq!(cfg.level, "200");
    assert_eq!(cfg.institution, "");

    let json = serde_json::to_value(FilterConfig::default()).unwrap();
    assert_eq!(json["status"], "all");
    assert_eq!(json["orderBy"], "");
    assert_eq!(json["searchTerm"], "");
  }

  #[test]
  fn unknown_config_values_place_no_constraint() {
    let cfg: FilterConfig = serde_json::from_str(
      r#"{"status":"pending","orderBy":"weird","interest":"quantum","level":"200"}"#,
    )
    .unwrap();
    assert_eq!(cfg.status, Status::All);
    assert_eq!(cfg.order_by, OrderBy::Unordered);
    assert_eq!(cfg.interest, "quantum");
    assert_eq!(cfg.level, "200");

    let people = vec![
      intern(1, 200, details("Ama", "", "", "01/01/25", "31/12/25")),
      intern(2, 200, details("Kofi", "", "", "01/01/20", "31/12/20")),
    ];
    let relaxed = FilterConfig { interest: String::new(), ..cfg };
    let kept: Vec<_> = people.iter().filter(|p| include(p, &relaxed, now())).collect();
    assert_eq!(kept.len(), 2);
  }

  #[test]
  fn order_by_string_forms() {
    assert_eq!("".parse::<OrderBy>().unwrap(), OrderBy::Unordered);
    assert_eq!("oldest-first".parse::<OrderBy>().unwrap(), OrderBy::OldestFirst);
    assert_eq!("createdAtAsc".parse::<OrderBy>().unwrap(), OrderBy::OldestFirst);
    assert_eq!("weird".parse::<OrderBy>().unwrap(), OrderBy::Unordered);
    assert_eq!(OrderBy::NewestFirst.to_string(), "newest-first");
  }

  fn arb_person() -> impl Strategy<Value = Person> {
    let dates = prop::sample::select(vec![
      "01/01/24", "15/06/24", "01/01/25", "15/06/25", "31/12/25", "01/01/26", "bad",
    ]);
    (
      prop::sample::select(vec![100u16, 200, 300, 400]),
      prop::sample::select(vec!["UG", "KNUST", "Ashesi University"]),
      prop::sample::select(vec!["web apps", "Networking", "data science", "hardware", ""]),
      dates.clone(),
      dates,
      any::<bool>(),
    )
      .prop_map(|(level, inst, interest, start, end, is_nss)| {
        let d = details("Someone", inst, interest, start, end);
        if is_nss { nss(1, d) } else { intern(1, level, d) }
      })
  }

  fn arb_config() -> impl Strategy<Value = FilterConfig> {
    (
      prop::sample::select(vec![Status::All, Status::Active, Status::Completed]),
      prop::sample::select(vec!["", "100", "200", "300", "400"]),
      prop::sample::select(vec!["", "UG", "KNUST"]),
      prop::sample::select(vec!["", "web-dev", "database", "hardware", "other"]),
      prop::sample::select(vec!["", "2025-01-01", "01/06/24"]),
    )
      .prop_map(|(status, level, institution, interest, date)| FilterConfig {
        status,
        level: level.into(),
        institution: institution.into(),
        interest: interest.into(),
        date: date.into(),
        ..Default::default()
      })
  }

  proptest! {
    #[test]
    fn predicate_order_does_not_change_result(
      person in arb_person(),
      config in arb_config(),
      rotation in 0usize..5,
    ) {
      let preds = Predicates::new(&config, now());
      let mut order = Predicate::ORDER;
      order.rotate_left(rotation);
      order.reverse();
      let reordered = preds.matches_search(&person) && order.iter().all(|p| preds.check(*p, &person));
      prop_assert_eq!(preds.include(&person), reordered);
    }
  }
}
