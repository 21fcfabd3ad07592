//! TUI rendering: orchestrates all panes.

pub mod filter_bar;
pub mod person_detail;
pub mod person_form;
pub mod person_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use roster_core::PersonId;

use crate::app::{App, InputTarget, Mode};

// ─── Root draw ───────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, filter bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(2), // filter bar
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  filter_bar::draw(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);

  match &app.mode {
    Mode::Form(form) => person_form::draw(f, centered(area, 60, 16), form),
    Mode::ConfirmDelete(id) => draw_confirm(f, centered(area, 50, 5), app, *id),
    Mode::Normal | Mode::Input(_) => {}
  }
}

/// A `width` × `height` rectangle centred in `area`, clipped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

// ─── Header ──────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" roster · {}  [Tab] switch  [q] quit", app.kind().label()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{}  {date} ", app.client.base_url()),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  // Split into left list pane (40%) and right detail pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  person_list::draw(f, cols[0], app);
  person_detail::draw(f, cols[1], app);
}

// ─── Dialogs ─────────────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, app: &App, id: PersonId) {
  let name = app.state.record(id).map(|p| p.name()).unwrap_or("this record");
  let block = Block::default()
    .title(" Delete ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(format!("Delete {name}?")),
      Line::from(""),
      Line::from(Span::styled("[y] yes   any other key: cancel", Style::default().fg(Color::Gray))),
    ]),
    inner,
  );
}

// ─── Status bar ──────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.mode {
    Mode::Normal => (
      "NORMAL",
      "jk move  / search  s status  o order  v level  i interest  n institution  t date  r reset  a add  e edit  x delete",
    ),
    Mode::Input(InputTarget::Search) => ("SEARCH", "Type to filter  Enter keep  Esc clear"),
    Mode::Input(InputTarget::Date) => ("DATE", "YYYY-MM-DD or DD/MM/YY  Enter apply  Esc cancel"),
    Mode::Form(_) => ("FORM", "Tab/↑↓ field  Enter save  Esc cancel"),
    Mode::ConfirmDelete(_) => ("CONFIRM", "y delete  any other key cancel"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    if app.status_msg.starts_with("Error") {
      Style::default().fg(Color::Red)
    } else {
      Style::default().fg(Color::Gray)
    },
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
