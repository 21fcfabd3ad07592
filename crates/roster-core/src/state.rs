//! [`StateStore`]: the current record set, the active filters, and the
//! derived view.
//!
//! The store owns its records and configuration outright. The filtered view
//! and counts are derived from them and recomputed only when an input
//! actually changes (or on an explicit [`StateStore::refresh`]), so reading
//! them on every frame is free.

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  engine::{self, FilterCounts},
  filter::FilterConfig,
  person::{Person, PersonId, RecordKind},
  status::{self, Clock, Status, SystemClock},
};

/// Edit surface bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
  #[default]
  Closed,
  /// Open for a new record.
  Create,
  /// Open on an existing record.
  Edit(Person),
}

pub struct StateStore<C: Clock = SystemClock> {
  kind:     RecordKind,
  records:  Vec<Person>,
  filters:  FilterConfig,
  modal:    Modal,
  clock:    C,
  view:     Vec<Person>,
  counts:   FilterCounts,
  /// The instant the view and counts were derived at.
  as_of:    DateTime<Utc>,
  revision: u64,
}

impl StateStore<SystemClock> {
  pub fn new(kind: RecordKind) -> Self { Self::with_clock(kind, SystemClock) }
}

impl<C: Clock> StateStore<C> {
  pub fn with_clock(kind: RecordKind, clock: C) -> Self {
    let mut store = Self {
      kind,
      records: Vec::new(),
      filters: FilterConfig::default(),
      modal: Modal::Closed,
      clock,
      view: Vec::new(),
      counts: FilterCounts::default(),
      as_of: DateTime::<Utc>::MIN_UTC,
      revision: 0,
    };
    store.recompute();
    store
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  fn recompute(&mut self) {
    let now = self.clock.now();
    self.view = engine::apply_at(&self.records, &self.filters, now);
    self.counts = engine::counts_at(&self.records, now);
    self.as_of = now;
    self.revision += 1;
  }

  /// Records passing the current filters, in the configured order.
  pub fn filtered_view(&self) -> &[Person] { &self.view }

  /// Population counts over all records, regardless of filters.
  pub fn counts(&self) -> FilterCounts { self.counts }

  /// The instant the current view and counts were derived at.
  pub fn as_of(&self) -> DateTime<Utc> { self.as_of }

  /// Whether `person` counted as active when the view was last derived.
  pub fn is_active(&self, person: &Person) -> bool { status::is_active(person, self.as_of) }

  /// Number of times the derived state has been computed.
  pub fn revision(&self) -> u64 { self.revision }

  /// Recompute derived state against the clock's current time.
  pub fn refresh(&mut self) { self.recompute(); }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn kind(&self) -> RecordKind { self.kind }

  pub fn records(&self) -> &[Person] { &self.records }

  pub fn filters(&self) -> &FilterConfig { &self.filters }

  pub fn modal(&self) -> &Modal { &self.modal }

  pub fn is_modal_open(&self) -> bool { self.modal != Modal::Closed }

  /// The record being edited, if the modal is open on one.
  pub fn edit_target(&self) -> Option<&Person> {
    match &self.modal {
      Modal::Edit(p) => Some(p),
      _ => None,
    }
  }

  pub fn record(&self, id: PersonId) -> Option<&Person> {
    self.records.iter().find(|p| p.id() == id)
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// Replace the whole record set, e.g. with a freshly fetched list.
  pub fn set_records(&mut self, records: Vec<Person>) {
    self.records = records;
    self.recompute();
  }

  pub fn add_record(&mut self, record: Person) -> Result<()> {
    self.check_kind(&record)?;
    self.records.push(record);
    self.recompute();
    Ok(())
  }

  /// Replace the record with id `id` in place, keeping its position. The
  /// replacement must carry the same id.
  pub fn replace_record(&mut self, id: PersonId, record: Person) -> Result<()> {
    self.check_kind(&record)?;
    if record.id() != id {
      return Err(Error::IdMismatch { expected: id, actual: record.id() });
    }
    let slot = self
      .records
      .iter_mut()
      .find(|p| p.id() == id)
      .ok_or(Error::PersonNotFound { kind: self.kind, id })?;
    *slot = record;
    self.recompute();
    Ok(())
  }

  pub fn remove_record(&mut self, id: PersonId) -> Result<Person> {
    let index = self
      .records
      .iter()
      .position(|p| p.id() == id)
      .ok_or(Error::PersonNotFound { kind: self.kind, id })?;
    let removed = self.records.remove(index);
    if self.edit_target().is_some_and(|p| p.id() == id) {
      self.modal = Modal::Closed;
    }
    self.recompute();
    Ok(removed)
  }

  fn check_kind(&self, record: &Person) -> Result<()> {
    if record.kind() == self.kind {
      Ok(())
    } else {
      Err(Error::KindMismatch {
        id:       record.id(),
        expected: self.kind,
        actual:   record.kind(),
      })
    }
  }

  /// All records currently active or completed, ignoring filters.
  pub fn records_with_status(&self, wanted: Status) -> Vec<&Person> {
    let now = self.clock.now();
    self
      .records
      .iter()
      .filter(|p| wanted.admits(status::is_active(p, now)))
      .collect()
  }

  /// Plain case-insensitive substring search over names, ignoring filters.
  pub fn search_by_name(&self, term: &str) -> Vec<&Person> {
    let needle = term.to_lowercase();
    self
      .records
      .iter()
      .filter(|p| p.name().to_lowercase().contains(&needle))
      .collect()
  }

  // ── Filters ───────────────────────────────────────────────────────────────

  /// Replace the filter configuration wholesale. Setting an identical
  /// configuration does not recompute.
  pub fn set_filters(&mut self, filters: FilterConfig) {
    if filters == self.filters {
      return;
    }
    self.filters = filters;
    self.recompute();
  }

  pub fn reset_filters(&mut self) { self.set_filters(FilterConfig::default()); }

  // ── Modal ─────────────────────────────────────────────────────────────────

  /// Set the edit target and open the edit surface in one step.
  pub fn open_edit_target(&mut self, record: Person) { self.modal = Modal::Edit(record); }

  pub fn open_create(&mut self) { self.modal = Modal::Create; }

  pub fn close_modal(&mut self) { self.modal = Modal::Closed; }
}
