//! Add/edit form overlay.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::form::{Field, PersonForm};

pub fn draw(f: &mut Frame, area: Rect, form: &PersonForm) {
  let title = match form.editing() {
    Some(id) => format!(" Edit {} #{id} ", form.kind()),
    None => format!(" New {} ", form.kind()),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = form
    .values()
    .iter()
    .enumerate()
    .map(|(i, (field, value))| {
      let focused = i == form.focus();
      let label_style = if focused {
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Gray)
      };
      let cursor = if focused { "_" } else { "" };
      Line::from(vec![
        Span::styled(format!("{:<12}", field.label()), label_style),
        Span::raw(format!("{value}{cursor}")),
      ])
    })
    .collect();

  let hint = match form.values().get(form.focus()).map(|(field, _)| *field) {
    Some(Field::StartDate | Field::EndDate) => "Dates as DD/MM/YY or DD/MM/YYYY",
    Some(Field::Level) => "100, 200, 300 or 400",
    _ => "",
  };
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

  f.render_widget(Paragraph::new(lines), inner);
}
