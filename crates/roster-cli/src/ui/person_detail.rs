//! Record detail pane: right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::{Person, date};

use crate::app::App;

/// Render the record under the cursor into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(person) = app.selected() else {
    let block = Block::default()
      .title(" Detail ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("No record selected.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", person.name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  f.render_widget(Paragraph::new(lines(app, person)).wrap(Wrap { trim: false }), inner);
}

fn lines(app: &App, person: &Person) -> Vec<Line<'static>> {
  let d = person.details();
  let mut rows: Vec<(&'static str, String)> = vec![
    ("phone", d.phone.clone()),
    ("institution", d.institution.clone()),
    ("course", d.course.clone()),
    ("interest", d.interest.clone()),
    ("start", describe_date(&d.start_date)),
    ("end", describe_date(&d.end_date)),
  ];
  match person {
    Person::Intern(i) => rows.push(("level", i.level.to_string())),
    Person::Nss(n) => {
      rows.push(("nss id", n.nss_id.clone()));
      rows.push(("email", n.email.clone()));
    }
  }

  let (status_label, status_style) = if app.state.is_active(person) {
    ("active", Style::default().fg(Color::Green))
  } else {
    ("completed", Style::default().fg(Color::DarkGray))
  };

  let mut lines = vec![
    Line::from(vec![
      label("status"),
      Span::styled(status_label, status_style.add_modifier(Modifier::BOLD)),
    ]),
    Line::from(""),
  ];
  lines.extend(rows.into_iter().map(|(name, value)| {
    let value = if value.is_empty() {
      Span::styled("—", Style::default().fg(Color::DarkGray))
    } else {
      Span::raw(value)
    };
    Line::from(vec![label(name), value])
  }));
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("id {}", person.id()),
    Style::default().fg(Color::DarkGray),
  )));
  lines
}

fn label(name: &'static str) -> Span<'static> {
  Span::styled(
    format!("{name:<12}"),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )
}

/// The date as entered, plus how it was read.
fn describe_date(text: &str) -> String {
  match date::parse(text).instant() {
    Some(instant) => format!("{text}  ({})", instant.format("%-d %b %Y")),
    None if text.is_empty() => String::new(),
    None => format!("{text}  (unreadable)"),
  }
}
