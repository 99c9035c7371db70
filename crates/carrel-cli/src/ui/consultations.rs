//! Consultations pane — booking requests, list and detail.

use carrel_core::consultation::{Consultation, ConsultationStatus};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the consultations screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_list(f, cols[0], app);

  let open = app
    .detail
    .and_then(|id| app.consultations.rows.iter().find(|c| c.id == id));
  match open {
    Some(row) => draw_detail(f, cols[1], app, row),
    None => {
      super::draw_empty_detail(f, cols[1], "Select a request and press Enter.")
    }
  }
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_consultations();
  let total = app.consultations.rows.len();

  let mut title = if visible.len() == total {
    format!(" Consultations ({total}) ")
  } else {
    format!(" Consultations ({}/{total}) ", visible.len())
  };
  if app.consultations.sample {
    title.push_str("[sample] ");
  }

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let mut inner = block.inner(area);
  f.render_widget(block, area);
  inner = super::carve_filter_bar(f, inner, app);

  let items: Vec<ListItem> = visible
    .iter()
    .map(|c| {
      let marker = if app.unsynced.contains(&c.id) { "*" } else { " " };
      ListItem::new(Line::from(vec![
        Span::raw(format!(
          "{marker}{:<17}",
          super::truncate(&c.student_name, 16)
        )),
        Span::styled(
          format!("{:<11}", c.status.label()),
          Style::default().fg(status_color(c.status)),
        ),
        Span::styled(
          c.created_at.format("%m-%d %H:%M").to_string(),
          Style::default().fg(Color::DarkGray),
        ),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

fn draw_detail(f: &mut Frame, area: Rect, app: &App, row: &Consultation) {
  let block = Block::default()
    .title(format!(" {} ", row.student_name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    super::field("phone", row.phone.clone()),
    super::field("grade", row.grade.clone().unwrap_or_else(|| "—".into())),
    super::field(
      "preferred",
      row
        .preferred_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "—".into()),
    ),
    super::field("status", row.status.label().to_owned()),
    super::field(
      "created",
      row.created_at.format("%Y-%m-%d %H:%M").to_string(),
    ),
  ];
  if let Some(message) = &row.message {
    lines.push(Line::from(""));
    lines.push(super::field("message", message.clone()));
  }
  lines.push(Line::from(""));
  lines.push(super::field(
    "memo",
    row.memo.clone().unwrap_or_else(|| "—".into()),
  ));
  if app.unsynced.contains(&row.id) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "* local changes not synced",
      Style::default().fg(Color::Red),
    )));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn status_color(status: ConsultationStatus) -> Color {
  match status {
    ConsultationStatus::Pending => Color::Yellow,
    ConsultationStatus::Contacted => Color::Cyan,
    ConsultationStatus::Scheduled => Color::Blue,
    ConsultationStatus::Completed => Color::Green,
    ConsultationStatus::Cancelled => Color::DarkGray,
  }
}
