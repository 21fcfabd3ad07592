//! Application state machine and event dispatcher.
//!
//! Records, filters, and the derived view live in a [`StateStore`]; this
//! module only adds cursor, input, and dialog bookkeeping around it.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  FilterConfig, Person, PersonId, RecordKind, StateStore,
  date,
  filter::{InterestCategory, LEVELS, OrderBy},
  status::Status,
};

use crate::{client::ApiClient, form::PersonForm};

// ─── Mode ────────────────────────────────────────────────────────────────────

/// Which free-text filter the input line is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
  Search,
  Date,
}

#[derive(Debug, Clone)]
pub enum Mode {
  /// Navigating the list; single keys change filters.
  Normal,
  /// Typing into the search or date filter.
  Input(InputTarget),
  /// The add/edit form is open.
  Form(PersonForm),
  /// Waiting for `y` to confirm deleting a record.
  ConfirmDelete(PersonId),
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub state:      StateStore,
  pub mode:       Mode,
  /// Cursor position within the filtered view.
  pub cursor:     usize,
  /// Edit buffer for [`Mode::Input`].
  pub input:      String,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  pub client:     Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient, kind: RecordKind) -> Self {
    Self {
      state:      StateStore::new(kind),
      mode:       Mode::Normal,
      cursor:     0,
      input:      String::new(),
      status_msg: String::new(),
      client:     Arc::new(client),
    }
  }

  pub fn kind(&self) -> RecordKind { self.state.kind() }

  /// The record under the cursor, if any.
  pub fn selected(&self) -> Option<&Person> { self.state.filtered_view().get(self.cursor) }

  fn clamp_cursor(&mut self) {
    let len = self.state.filtered_view().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the authoritative list for the current kind.
  pub async fn load(&mut self) -> anyhow::Result<()> {
    let records = self.client.list(self.kind()).await?;
    tracing::debug!(kind = %self.kind(), count = records.len(), "records loaded");
    self.state.set_records(records);
    self.clamp_cursor();
    Ok(())
  }

  /// Reload, reporting failure in the status bar instead of propagating it.
  async fn reload(&mut self) -> bool {
    match self.load().await {
      Ok(()) => true,
      Err(e) => {
        self.status_msg = format!("Error: {e:#}");
        false
      }
    }
  }

  /// Switch between interns and NSS personnel. The current page is kept if
  /// the other list cannot be fetched.
  async fn switch_kind(&mut self) {
    let other = match self.kind() {
      RecordKind::Intern => RecordKind::Nss,
      RecordKind::Nss => RecordKind::Intern,
    };
    match self.client.list(other).await {
      Ok(records) => {
        let mut state = StateStore::new(other);
        state.set_records(records);
        self.state = state;
        self.cursor = 0;
        self.status_msg = format!("Showing {}", other.label());
      }
      Err(e) => self.status_msg = format!("Error: {e:#}"),
    }
  }

  // ── Filters ───────────────────────────────────────────────────────────────

  fn update_filters(&mut self, change: impl FnOnce(&mut FilterConfig)) {
    let mut filters = self.state.filters().clone();
    change(&mut filters);
    self.state.set_filters(filters);
    self.clamp_cursor();
  }

  /// Distinct non-empty institutions among the loaded records, sorted.
  pub fn institutions(&self) -> Vec<String> {
    let mut all: Vec<String> = self
      .state
      .records()
      .iter()
      .map(|p| p.details().institution.trim().to_owned())
      .filter(|i| !i.is_empty())
      .collect();
    all.sort();
    all.dedup();
    all
  }

  fn cycle_status(&mut self) {
    let next = cycle(&[Status::All, Status::Active, Status::Completed], &self.state.filters().status);
    self.update_filters(|f| f.status = next);
  }

  fn cycle_order(&mut self) {
    let options = [OrderBy::Unordered, OrderBy::NewestFirst, OrderBy::OldestFirst];
    let next = cycle(&options, &self.state.filters().order_by);
    self.update_filters(|f| f.order_by = next);
  }

  fn cycle_level(&mut self) {
    let options: Vec<String> = std::iter::once(String::new())
      .chain(LEVELS.iter().map(u16::to_string))
      .collect();
    let next = cycle(&options, &self.state.filters().level);
    self.update_filters(|f| f.level = next);
  }

  fn cycle_interest(&mut self) {
    let options: Vec<String> = std::iter::once(String::new())
      .chain(InterestCategory::all().map(|c| c.to_string()))
      .collect();
    let next = cycle(&options, &self.state.filters().interest);
    self.update_filters(|f| f.interest = next);
  }

  fn cycle_institution(&mut self) {
    let options: Vec<String> = std::iter::once(String::new()).chain(self.institutions()).collect();
    let next = cycle(&options, &self.state.filters().institution);
    self.update_filters(|f| f.institution = next);
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode.clone() {
      Mode::Normal => return Ok(self.handle_normal_key(key).await),
      Mode::Input(target) => self.handle_input_key(target, key),
      Mode::Form(form) => self.handle_form_key(form, key).await,
      Mode::ConfirmDelete(id) => self.handle_confirm_key(id, key).await,
    }
    Ok(true)
  }

  async fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    self.status_msg.clear();
    match key.code {
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.state.filtered_view().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.cursor = self.state.filtered_view().len().saturating_sub(1);
      }

      // Filters
      KeyCode::Char('/') => self.start_input(InputTarget::Search),
      KeyCode::Char('t') => self.start_input(InputTarget::Date),
      KeyCode::Char('s') => self.cycle_status(),
      KeyCode::Char('1') => self.update_filters(|f| f.status = Status::All),
      KeyCode::Char('2') => self.update_filters(|f| f.status = Status::Active),
      KeyCode::Char('3') => self.update_filters(|f| f.status = Status::Completed),
      KeyCode::Char('o') => self.cycle_order(),
      KeyCode::Char('v') if self.kind() == RecordKind::Intern => self.cycle_level(),
      KeyCode::Char('i') => self.cycle_interest(),
      KeyCode::Char('n') => self.cycle_institution(),
      KeyCode::Char('r') => {
        self.state.reset_filters();
        self.clamp_cursor();
        self.status_msg = "Filters reset".into();
      }

      // Records
      KeyCode::Char('a') => {
        self.state.open_create();
        self.mode = Mode::Form(PersonForm::blank(self.kind()));
      }
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(person) = self.selected().cloned() {
          self.mode = Mode::Form(PersonForm::from_person(&person));
          self.state.open_edit_target(person);
        }
      }
      KeyCode::Char('x') | KeyCode::Delete => {
        if let Some(id) = self.selected().map(Person::id) {
          self.mode = Mode::ConfirmDelete(id);
        }
      }
      KeyCode::Char('R') | KeyCode::F(5) => {
        if self.reload().await {
          self.status_msg = "Reloaded".into();
        }
      }
      KeyCode::Tab => self.switch_kind().await,

      _ => {}
    }
    true
  }

  fn start_input(&mut self, target: InputTarget) {
    self.input = match target {
      InputTarget::Search => self.state.filters().search_term.clone(),
      InputTarget::Date => self.state.filters().date.clone(),
    };
    self.mode = Mode::Input(target);
  }

  fn handle_input_key(&mut self, target: InputTarget, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        if target == InputTarget::Search {
          self.update_filters(|f| f.search_term.clear());
        }
        self.input.clear();
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => {
        if target == InputTarget::Date {
          let text = self.input.trim().to_owned();
          if !text.is_empty() && !date::parse_boundary(&text).is_valid() {
            self.status_msg = format!("Unrecognised date {text:?}; use YYYY-MM-DD or DD/MM/YY");
            return;
          }
          self.update_filters(|f| f.date = text);
        }
        self.mode = Mode::Normal;
      }
      KeyCode::Backspace => {
        self.input.pop();
        self.apply_live_search(target);
      }
      KeyCode::Char(c) => {
        self.input.push(c);
        self.apply_live_search(target);
      }
      _ => {}
    }
  }

  /// The search filter follows the input line as it is typed.
  fn apply_live_search(&mut self, target: InputTarget) {
    if target == InputTarget::Search {
      let term = self.input.clone();
      self.update_filters(|f| f.search_term = term);
      self.cursor = 0;
    }
  }

  async fn handle_form_key(&mut self, mut form: PersonForm, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.close_form();
        return;
      }
      KeyCode::Enter => {
        self.submit(&form).await;
        return;
      }
      KeyCode::Tab | KeyCode::Down => form.next_field(),
      KeyCode::BackTab | KeyCode::Up => form.prev_field(),
      KeyCode::Backspace => form.pop(),
      KeyCode::Char(c) => form.push(c),
      _ => return,
    }
    self.mode = Mode::Form(form);
  }

  fn close_form(&mut self) {
    self.state.close_modal();
    self.mode = Mode::Normal;
  }

  /// Send the form to the server. On success the list is reloaded and the
  /// form closed; on failure the form stays open with the error shown.
  async fn submit(&mut self, form: &PersonForm) {
    let input = match form.to_input() {
      Ok(input) => input,
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        return;
      }
    };

    let result = match form.editing() {
      Some(id) => self.client.update(id, &input).await,
      None => self.client.create(&input).await,
    };

    match result {
      Ok(saved) => {
        let verb = if form.editing().is_some() { "Updated" } else { "Added" };
        tracing::info!(kind = %saved.kind(), id = saved.id(), "{verb} record");
        self.close_form();
        if self.reload().await {
          self.status_msg = format!("{verb} {}", saved.name());
        }
      }
      Err(e) => self.status_msg = format!("Error: {e:#}"),
    }
  }

  async fn handle_confirm_key(&mut self, id: PersonId, key: KeyEvent) {
    self.mode = Mode::Normal;
    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
      self.status_msg = "Delete cancelled".into();
      return;
    }

    let name = self.state.record(id).map(|p| p.name().to_owned()).unwrap_or_default();
    match self.client.delete(self.kind(), id).await {
      Ok(()) => {
        tracing::info!(kind = %self.kind(), id, "deleted record");
        if self.reload().await {
          self.status_msg = format!("Deleted {name}");
        }
      }
      Err(e) => self.status_msg = format!("Error: {e:#}"),
    }
  }
}

/// The option after `current`, wrapping around. Unknown values restart at the
/// first option.
fn cycle<T: Clone + PartialEq>(options: &[T], current: &T) -> T {
  let next = options
    .iter()
    .position(|o| o == current)
    .map_or(0, |i| (i + 1) % options.len());
  options[next].clone()
}

#[cfg(test)]
mod tests {
  use roster_core::person::{NewIntern, PersonDetails};

  use super::*;
  use crate::client::ApiConfig;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  /// An app whose server is unreachable, with records loaded directly.
  fn app() -> App {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:1".into(),
      username: String::new(),
      password: String::new(),
    })
    .unwrap();
    let mut app = App::new(client, RecordKind::Intern);
    let records = [
      (1, "Ama", "UG", "web", "01/01/20", "31/12/99"),
      (2, "Kofi", "KNUST", "hardware", "01/01/20", "31/12/20"),
      (3, "Akua", "UG", "security", "01/01/21", "31/12/99"),
    ]
    .into_iter()
    .map(|(id, name, inst, interest, start, end)| {
      Person::Intern(
        NewIntern {
          details: PersonDetails {
            name:        name.into(),
            institution: inst.into(),
            interest:    interest.into(),
            start_date:  start.into(),
            end_date:    end.into(),
            ..Default::default()
          },
          level:   if id == 2 { 200 } else { 100 },
        }
        .with_id(id),
      )
    })
    .collect();
    app.state.set_records(records);
    app
  }

  fn view_ids(app: &App) -> Vec<PersonId> {
    app.state.filtered_view().iter().map(Person::id).collect()
  }

  #[test]
  fn cycle_wraps_and_restarts() {
    assert_eq!(cycle(&[1, 2, 3], &1), 2);
    assert_eq!(cycle(&[1, 2, 3], &3), 1);
    assert_eq!(cycle(&[1, 2, 3], &9), 1);
  }

  #[tokio::test]
  async fn status_keys_filter_view() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('2'))).await.unwrap();
    assert_eq!(view_ids(&app), vec![1, 3]);
    app.handle_key(key(KeyCode::Char('s'))).await.unwrap();
    assert_eq!(app.state.filters().status, Status::Completed);
    assert_eq!(view_ids(&app), vec![2]);
    assert_eq!(app.state.counts().all, 3);
  }

  #[tokio::test]
  async fn search_is_live_and_escape_clears_it() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    for c in "ak".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    assert_eq!(view_ids(&app), vec![3]);

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert!(matches!(app.mode, Mode::Normal));
    assert_eq!(view_ids(&app).len(), 3);
  }

  #[tokio::test]
  async fn institution_and_level_cycle_through_known_values() {
    let mut app = app();
    assert_eq!(app.institutions(), vec!["KNUST".to_string(), "UG".to_string()]);

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert_eq!(app.state.filters().institution, "KNUST");
    assert_eq!(view_ids(&app), vec![2]);

    app.handle_key(key(KeyCode::Char('r'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('v'))).await.unwrap();
    assert_eq!(app.state.filters().level, "100");
    assert_eq!(view_ids(&app), vec![1, 3]);
  }

  #[tokio::test]
  async fn bad_date_keeps_input_open() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('t'))).await.unwrap();
    for c in "soon".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(matches!(app.mode, Mode::Input(InputTarget::Date)));
    assert!(app.state.filters().date.is_empty());
    assert!(app.status_msg.contains("Unrecognised"));
  }

  #[tokio::test]
  async fn cursor_stays_inside_view() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('G'))).await.unwrap();
    assert_eq!(app.cursor, 2);
    app.handle_key(key(KeyCode::Char('3'))).await.unwrap();
    assert_eq!(app.cursor, 0);
    assert_eq!(app.selected().map(Person::id), Some(2));
  }

  #[tokio::test]
  async fn edit_opens_form_on_selected_record() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('j'))).await.unwrap();
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    match &app.mode {
      Mode::Form(form) => assert_eq!(form.editing(), Some(2)),
      other => panic!("expected form, got {other:?}"),
    }
    assert_eq!(app.state.edit_target().map(Person::id), Some(2));

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert!(!app.state.is_modal_open());
  }

  #[tokio::test]
  async fn failed_save_leaves_state_unchanged() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('a'))).await.unwrap();
    for c in "Yaw".chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
    let before = app.state.revision();
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert!(matches!(app.mode, Mode::Form(_)));
    assert!(app.status_msg.starts_with("Error"));
    assert_eq!(app.state.records().len(), 3);
    assert_eq!(app.state.revision(), before);
  }

  #[tokio::test]
  async fn delete_needs_confirmation() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('x'))).await.unwrap();
    assert!(matches!(app.mode, Mode::ConfirmDelete(1)));
    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert!(matches!(app.mode, Mode::Normal));
    assert_eq!(app.state.records().len(), 3);
  }
}
