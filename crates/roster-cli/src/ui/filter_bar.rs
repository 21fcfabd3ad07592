//! Filter bar: status chips with counts, then the other active criteria.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};
use roster_core::{
  filter::{InterestCategory, OrderBy},
  status::Status,
};

use crate::app::{App, InputTarget, Mode};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filters = app.state.filters();
  let counts = app.state.counts();

  let chip = |status: Status, label: &str, count: usize, key: char| {
    let style = if filters.status == status {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    Span::styled(format!(" {key} {label} ({count}) "), style)
  };

  let chips = Line::from(vec![
    chip(Status::All, "All", counts.all, '1'),
    Span::raw(" "),
    chip(Status::Active, "Active", counts.active, '2'),
    Span::raw(" "),
    chip(Status::Completed, "Completed", counts.completed, '3'),
    Span::raw("   "),
    Span::styled(
      format!("showing {}", app.state.filtered_view().len()),
      Style::default().fg(Color::DarkGray),
    ),
  ]);

  let mut criteria: Vec<Span> = Vec::new();
  let mut push = |name: &str, value: String| {
    criteria.push(Span::styled(format!(" {name}: "), Style::default().fg(Color::DarkGray)));
    criteria.push(Span::styled(value, Style::default().fg(Color::Yellow)));
  };

  let order = match filters.order_by {
    OrderBy::Unordered => "as entered",
    OrderBy::NewestFirst => "newest first",
    OrderBy::OldestFirst => "oldest first",
  };
  push("order", order.to_string());
  if !filters.level.is_empty() {
    push("level", filters.level.clone());
  }
  if !filters.interest.is_empty() {
    let label = filters
      .interest
      .parse::<InterestCategory>()
      .map(|c| c.label().to_string())
      .unwrap_or_else(|_| filters.interest.clone());
    push("interest", label);
  }
  if !filters.institution.is_empty() {
    push("institution", filters.institution.clone());
  }

  match app.mode {
    Mode::Input(InputTarget::Date) => push("date", format!("{}_", app.input)),
    _ if !filters.date.is_empty() => push("date", filters.date.clone()),
    _ => {}
  }
  match app.mode {
    Mode::Input(InputTarget::Search) => push("search", format!("/{}_", app.input)),
    _ if !filters.search_term.is_empty() => push("search", format!("/{}", filters.search_term)),
    _ => {}
  }
  if filters.is_narrowing() {
    criteria.push(Span::styled("   r to reset", Style::default().fg(Color::DarkGray)));
  }

  f.render_widget(Paragraph::new(vec![chips, Line::from(criteria)]), area);
}
