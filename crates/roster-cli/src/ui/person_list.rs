//! Record list pane: left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the filtered record list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let view = app.state.filtered_view();
  let total = app.state.records().len();

  let title = if view.len() == total {
    format!(" {} ({total}) ", app.kind().label())
  } else {
    format!(" {} ({}/{total}) ", app.kind().label(), view.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  if view.is_empty() {
    let hint = if total == 0 {
      "No records yet. Press a to add one."
    } else {
      "Nothing matches. Press r to reset filters."
    };
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = view
    .iter()
    .map(|person| {
      let (marker, marker_style) = if app.state.is_active(person) {
        ("● ", Style::default().fg(Color::Green))
      } else {
        ("○ ", Style::default().fg(Color::DarkGray))
      };
      let institution = &person.details().institution;

      ListItem::new(Line::from(vec![
        Span::styled(marker, marker_style),
        Span::raw(person.name().to_string()),
        Span::styled(
          if institution.is_empty() { String::new() } else { format!("  {institution}") },
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
