//! TUI rendering — orchestrates all panes.

pub mod consultations;
pub mod dashboard;
pub mod franchise;
pub mod payments;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, InputMode, Screen};

const TABS: [(Screen, &str); 4] = [
  (Screen::Dashboard, "1 Dashboard"),
  (Screen::Consultations, "2 Consultations"),
  (Screen::Franchise, "3 Franchise"),
  (Screen::Payments, "4 Payments"),
];

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: tab bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tab bar
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  match app.screen {
    Screen::Dashboard => dashboard::draw(f, rows[1], app),
    Screen::Consultations => consultations::draw(f, rows[1], app),
    Screen::Franchise => franchise::draw(f, rows[1], app),
    Screen::Payments => payments::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  // Toasts float over everything else.
  draw_toasts(f, area, app);
}

// ─── Tab bar ──────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let mut left: Vec<Span> = vec![Span::raw(" ")];
  for (screen, label) in TABS {
    let style = if app.screen == screen {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    left.push(Span::styled(format!(" {label} "), style));
    left.push(Span::raw(" "));
  }

  let sample = match app.screen {
    Screen::Consultations => app.consultations.sample,
    Screen::Franchise => app.franchise.sample,
    Screen::Payments => app.payments.sample,
    Screen::Dashboard => false,
  };

  let date = Local::now().format("%Y-%m-%d").to_string();
  let mut right: Vec<Span> = Vec::new();
  if app.session_expired() {
    right.push(Span::styled(
      " SESSION EXPIRED ",
      Style::default()
        .fg(Color::White)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD),
    ));
    right.push(Span::raw(" "));
  } else if app.offline {
    right.push(Span::styled(
      " OFFLINE ",
      Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    ));
    right.push(Span::raw(" "));
  }
  if sample {
    right.push(Span::styled(
      " SAMPLE DATA ",
      Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD),
    ));
    right.push(Span::raw(" "));
  }
  right.push(Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  ));

  // Left tabs, right badges: pad the middle.
  let left_width: usize = left.iter().map(|s| s.content.len()).sum();
  let right_width: usize = right.iter().map(|s| s.content.len()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let mut spans = left;
  spans.push(Span::raw(" ".repeat(pad)));
  spans.extend(right);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.input {
    InputMode::Search => ("SEARCH", "Type to filter  Esc cancel  Enter keep"),
    InputMode::Memo => ("MEMO", "Type the memo  Enter save  Esc cancel"),
    InputMode::Confirm => {
      ("CONFIRM", "Paste the success URL  Enter submit  Esc cancel")
    }
    InputMode::Normal => match app.screen {
      Screen::Dashboard => (
        "NORMAL",
        "jk scroll  / search  s subject  f status  d dismiss  1-4 tabs  q quit",
      ),
      Screen::Consultations | Screen::Franchise => (
        "NORMAL",
        "jk move  Enter detail  u status  m memo  e export  r refresh  / search  q quit",
      ),
      Screen::Payments => (
        "NORMAL",
        "jk move  Enter detail  c confirm  e export  r refresh  / search  q quit",
      ),
    },
  };

  let mut status = match app.input {
    InputMode::Memo => format!("memo: {}_", app.draft),
    InputMode::Confirm => format!("url: {}_", app.draft),
    _ if !app.status_msg.is_empty() => app.status_msg.clone(),
    _ => hints.to_string(),
  };

  if let Some(snapshot) = &app.dashboard
    && !snapshot.warnings.is_empty()
  {
    status.push_str(&format!(
      "   ⚠ {} duplicate open session(s)",
      snapshot.warnings.len()
    ));
  }

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Toast overlay ────────────────────────────────────────────────────────────

fn draw_toasts(f: &mut Frame, area: Rect, app: &App) {
  if app.alerts.is_empty() {
    return;
  }
  let width = area.width.min(34);

  // Newest on top, capped to what fits without covering the whole screen.
  for (i, toast) in app.alerts.toasts().iter().rev().take(4).enumerate() {
    let y = area.y + 1 + (i as u16) * 3;
    if y + 3 > area.y + area.height {
      break;
    }
    let rect = Rect {
      x: area.x + area.width.saturating_sub(width),
      y,
      width,
      height: 3,
    };
    f.render_widget(Clear, rect);
    let block = Block::default()
      .title(" drowsiness ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    f.render_widget(
      Paragraph::new(Line::from(vec![
        Span::styled(
          toast.alert.student_name.clone(),
          Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" flagged drowsy"),
      ])),
      inner,
    );
  }
}

// ─── Shared pane helpers ──────────────────────────────────────────────────────

/// Carve a one-line filter bar out of the bottom of `inner` when the filter
/// is active or set, render it, and return the remaining area.
pub(crate) fn carve_filter_bar(f: &mut Frame, inner: Rect, app: &App) -> Rect {
  let show = app.input == InputMode::Search || !app.filter.is_empty();
  if !show || inner.height < 2 {
    return inner;
  }
  let bar = Rect {
    x:      inner.x,
    y:      inner.y + inner.height - 1,
    width:  inner.width,
    height: 1,
  };
  let rest = Rect { height: inner.height - 1, ..inner };

  let text = if app.input == InputMode::Search {
    format!("/{}_", app.filter)
  } else {
    format!("/{}", app.filter)
  };
  f.render_widget(
    Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
    bar,
  );
  rest
}

/// Right pane placeholder before a row is opened.
pub(crate) fn draw_empty_detail(f: &mut Frame, area: Rect, hint: &str) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      hint.to_string(),
      Style::default().fg(Color::DarkGray),
    ))),
    inner,
  );
}

/// One `label  value` detail line.
pub(crate) fn field(label: &str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<11}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

/// Clip to `max` display characters, with an ellipsis when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_owned()
  } else {
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
  }
}
