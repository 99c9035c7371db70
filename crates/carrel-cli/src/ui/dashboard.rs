//! Dashboard pane — stat tiles and live student cards.

use carrel_core::{
  dashboard::StudentStatus,
  format::{format_elapsed, format_minutes},
};
use chrono::Utc;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the dashboard into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(4), // stat tiles
      Constraint::Min(0),    // cards
    ])
    .split(area);

  draw_tiles(f, rows[0], app);
  draw_cards(f, rows[1], app);
}

// ─── Stat tiles ───────────────────────────────────────────────────────────────

fn draw_tiles(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(34),
      Constraint::Percentage(33),
      Constraint::Percentage(33),
    ])
    .split(area);

  let stats = app.dashboard.as_ref().map(|d| d.stats).unwrap_or_default();
  tile(f, cols[0], "students", stats.total_students, Color::Cyan);
  tile(f, cols[1], "studying now", stats.studying_now, Color::Green);
  tile(
    f,
    cols[2],
    "drowsiness detected",
    stats.drowsiness_detected,
    Color::Yellow,
  );
}

fn tile(f: &mut Frame, area: Rect, label: &str, value: usize, color: Color) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = vec![
    Line::from(Span::styled(
      value.to_string(),
      Style::default().fg(color).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      label.to_string(),
      Style::default().fg(Color::DarkGray),
    )),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Cards ────────────────────────────────────────────────────────────────────

fn draw_cards(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_students();
  let title = match &app.dashboard {
    Some(d) => format!(
      " Students ({}/{})  as of {} ",
      visible.len(),
      d.students.len(),
      d.as_of.format("%H:%M:%S"),
    ),
    None => " Students ".to_string(),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let mut inner = block.inner(area);
  f.render_widget(block, area);
  inner = super::carve_filter_bar(f, inner, app);

  if app.dashboard.is_none() {
    let hint = match &app.last_poll_error {
      Some(e) => format!("Waiting for the backend… last error: {e}"),
      None => "Waiting for the first poll…".to_string(),
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  // Active view filters get a line of their own above the cards.
  if (app.dash_subject.is_some() || app.dash_status.is_some())
    && inner.height > 1
  {
    let mut parts: Vec<String> = Vec::new();
    if let Some(subject) = &app.dash_subject {
      parts.push(format!("subject: {subject}"));
    }
    if let Some(status) = app.dash_status {
      parts.push(format!("status: {}", status.label()));
    }
    let bar = Rect { height: 1, ..inner };
    f.render_widget(
      Paragraph::new(parts.join("  "))
        .style(Style::default().fg(Color::Yellow)),
      bar,
    );
    inner.y += 1;
    inner.height -= 1;
  }

  let now = Utc::now();
  let items: Vec<ListItem> = visible
    .iter()
    .map(|card| {
      let (glyph, color) = status_glyph(card.status);
      let mut top = vec![
        Span::styled(format!("{glyph} "), Style::default().fg(color)),
        Span::styled(
          format!("{:<20}", super::truncate(&card.name, 19)),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          format!("{:<11}", card.status.label()),
          Style::default().fg(color),
        ),
      ];
      if let Some(subject) = &card.current_subject {
        top.push(Span::raw(format!("{subject}  ")));
      }
      if let Some(started) = card.started_at {
        top.push(Span::styled(
          format_elapsed(started, now),
          Style::default().fg(Color::DarkGray),
        ));
      }
      let bottom = Line::from(Span::styled(
        format!("   today {}", format_minutes(card.today_total_minutes)),
        Style::default().fg(Color::DarkGray),
      ));
      ListItem::new(vec![Line::from(top), bottom])
    })
    .collect();

  let mut state = ListState::default();
  state.select(if visible.is_empty() {
    None
  } else {
    Some(app.dash_scroll)
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White)),
    inner,
    &mut state,
  );
}

fn status_glyph(status: StudentStatus) -> (&'static str, Color) {
  match status {
    StudentStatus::Studying => ("●", Color::Green),
    StudentStatus::Drowsy => ("◆", Color::Yellow),
    StudentStatus::Completed => ("○", Color::Blue),
    StudentStatus::Offline => ("·", Color::DarkGray),
  }
}
