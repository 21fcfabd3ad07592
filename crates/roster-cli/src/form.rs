//! Add/edit form state for a single record.

use anyhow::{Result, anyhow, bail};
use roster_core::{
  filter::LEVELS,
  person::{NewIntern, NewNssPerson, NewPerson, Person, PersonDetails, PersonId, RecordKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Phone,
  Institution,
  Course,
  Interest,
  StartDate,
  EndDate,
  Level,
  NssId,
  Email,
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Name",
      Self::Phone => "Phone",
      Self::Institution => "Institution",
      Self::Course => "Course",
      Self::Interest => "Interest",
      Self::StartDate => "Start date",
      Self::EndDate => "End date",
      Self::Level => "Level",
      Self::NssId => "NSS ID",
      Self::Email => "Email",
    }
  }

  /// Fields shown for a record kind, in tab order.
  fn for_kind(kind: RecordKind) -> &'static [Field] {
    const COMMON: usize = 7;
    const INTERN: [Field; COMMON + 1] = [
      Field::Name,
      Field::Phone,
      Field::Institution,
      Field::Course,
      Field::Interest,
      Field::StartDate,
      Field::EndDate,
      Field::Level,
    ];
    const NSS: [Field; COMMON + 2] = [
      Field::Name,
      Field::Phone,
      Field::Institution,
      Field::Course,
      Field::Interest,
      Field::StartDate,
      Field::EndDate,
      Field::NssId,
      Field::Email,
    ];
    match kind {
      RecordKind::Intern => &INTERN,
      RecordKind::Nss => &NSS,
    }
  }
}

/// An open add or edit form.
#[derive(Debug, Clone)]
pub struct PersonForm {
  kind:    RecordKind,
  editing: Option<PersonId>,
  values:  Vec<(Field, String)>,
  focus:   usize,
}

impl PersonForm {
  /// An empty form for a new record.
  pub fn blank(kind: RecordKind) -> Self {
    let values = Field::for_kind(kind)
      .iter()
      .map(|&f| {
        let initial = if f == Field::Level { LEVELS[0].to_string() } else { String::new() };
        (f, initial)
      })
      .collect();
    Self { kind, editing: None, values, focus: 0 }
  }

  /// A form pre-filled from an existing record.
  pub fn from_person(person: &Person) -> Self {
    let mut form = Self::blank(person.kind());
    form.editing = Some(person.id());
    let d = person.details();
    for (field, value) in &mut form.values {
      *value = match field {
        Field::Name => d.name.clone(),
        Field::Phone => d.phone.clone(),
        Field::Institution => d.institution.clone(),
        Field::Course => d.course.clone(),
        Field::Interest => d.interest.clone(),
        Field::StartDate => d.start_date.clone(),
        Field::EndDate => d.end_date.clone(),
        Field::Level => person.level().map(|l| l.to_string()).unwrap_or_default(),
        Field::NssId => person.as_nss_person().map(|n| n.nss_id.clone()).unwrap_or_default(),
        Field::Email => person.as_nss_person().map(|n| n.email.clone()).unwrap_or_default(),
      };
    }
    form
  }

  pub fn kind(&self) -> RecordKind { self.kind }

  /// The id of the record being edited, or `None` when adding.
  pub fn editing(&self) -> Option<PersonId> { self.editing }

  pub fn values(&self) -> &[(Field, String)] { &self.values }

  pub fn focus(&self) -> usize { self.focus }

  // ── Editing ───────────────────────────────────────────────────────────────

  pub fn next_field(&mut self) { self.focus = (self.focus + 1) % self.values.len(); }

  pub fn prev_field(&mut self) {
    self.focus = (self.focus + self.values.len() - 1) % self.values.len();
  }

  pub fn push(&mut self, c: char) { self.values[self.focus].1.push(c); }

  pub fn pop(&mut self) { self.values[self.focus].1.pop(); }

  fn value(&self, field: Field) -> &str {
    self
      .values
      .iter()
      .find(|(f, _)| *f == field)
      .map(|(_, v)| v.trim())
      .unwrap_or_default()
  }

  // ── Submission ────────────────────────────────────────────────────────────

  /// Build the request body, rejecting input the server would refuse.
  pub fn to_input(&self) -> Result<NewPerson> {
    let details = PersonDetails {
      name:        self.value(Field::Name).to_owned(),
      phone:       self.value(Field::Phone).to_owned(),
      institution: self.value(Field::Institution).to_owned(),
      course:      self.value(Field::Course).to_owned(),
      interest:    self.value(Field::Interest).to_owned(),
      start_date:  self.value(Field::StartDate).to_owned(),
      end_date:    self.value(Field::EndDate).to_owned(),
    };

    let input = match self.kind {
      RecordKind::Intern => {
        let raw = self.value(Field::Level);
        let level: u16 = raw.parse().map_err(|_| anyhow!("level {raw:?} is not a number"))?;
        if !LEVELS.contains(&level) {
          bail!("level must be one of {LEVELS:?}");
        }
        NewPerson::Intern(NewIntern { details, level })
      }
      RecordKind::Nss => NewPerson::Nss(NewNssPerson {
        details,
        nss_id: self.value(Field::NssId).to_owned(),
        email: self.value(Field::Email).to_owned(),
      }),
    };
    input.validate()?;
    Ok(input)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn type_into(form: &mut PersonForm, text: &str) {
    for c in text.chars() {
      form.push(c);
    }
  }

  #[test]
  fn blank_intern_form_defaults_level() {
    let form = PersonForm::blank(RecordKind::Intern);
    assert_eq!(form.values().len(), 8);
    assert_eq!(form.values().last().unwrap(), &(Field::Level, "100".to_string()));
    assert!(form.editing().is_none());
  }

  #[test]
  fn blank_form_needs_a_name() {
    let form = PersonForm::blank(RecordKind::Intern);
    assert!(form.to_input().is_err());
  }

  #[test]
  fn typing_fills_focused_field() {
    let mut form = PersonForm::blank(RecordKind::Intern);
    type_into(&mut form, "Ama");
    form.next_field();
    type_into(&mut form, "024");
    form.pop();

    let input = form.to_input().unwrap();
    assert_eq!(input.details().name, "Ama");
    assert_eq!(input.details().phone, "02");
  }

  #[test]
  fn focus_wraps_both_ways() {
    let mut form = PersonForm::blank(RecordKind::Nss);
    form.prev_field();
    assert_eq!(form.values()[form.focus()].0, Field::Email);
    form.next_field();
    assert_eq!(form.focus(), 0);
  }

  #[test]
  fn invalid_level_is_rejected() {
    let mut form = PersonForm::blank(RecordKind::Intern);
    type_into(&mut form, "Ama");
    form.prev_field();
    form.pop();
    form.pop();
    form.pop();
    type_into(&mut form, "250");
    assert!(form.to_input().unwrap_err().to_string().contains("level"));
  }

  #[test]
  fn nss_form_requires_nss_id() {
    let mut form = PersonForm::blank(RecordKind::Nss);
    type_into(&mut form, "Kofi");
    assert!(form.to_input().is_err());

    while form.values()[form.focus()].0 != Field::NssId {
      form.next_field();
    }
    type_into(&mut form, "NSS-7");
    match form.to_input().unwrap() {
      NewPerson::Nss(n) => assert_eq!(n.nss_id, "NSS-7"),
      other => panic!("expected an NSS input, got {other:?}"),
    }
  }

  #[test]
  fn edit_form_round_trips_record() {
    let person = Person::Nss(
      NewNssPerson {
        details: PersonDetails {
          name: "Esi".into(),
          institution: "UCC".into(),
          start_date: "01/11/24".into(),
          end_date: "31/10/25".into(),
          ..Default::default()
        },
        nss_id:  "NSS-3".into(),
        email:   "esi@example.com".into(),
      }
      .with_id(9),
    );
    let form = PersonForm::from_person(&person);
    assert_eq!(form.editing(), Some(9));
    assert_eq!(form.to_input().unwrap(), person.to_new());
  }
}
