//! Franchise pane — partnership inquiries, list and detail.

use carrel_core::franchise::{FranchiseInquiry, InquiryStatus};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the franchise screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_list(f, cols[0], app);

  let open = app
    .detail
    .and_then(|id| app.franchise.rows.iter().find(|i| i.id == id));
  match open {
    Some(row) => draw_detail(f, cols[1], app, row),
    None => {
      super::draw_empty_detail(f, cols[1], "Select an inquiry and press Enter.")
    }
  }
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_franchise();
  let total = app.franchise.rows.len();

  let mut title = if visible.len() == total {
    format!(" Franchise ({total}) ")
  } else {
    format!(" Franchise ({}/{total}) ", visible.len())
  };
  if app.franchise.sample {
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
    .map(|i| {
      let marker = if app.unsynced.contains(&i.id) { "*" } else { " " };
      ListItem::new(Line::from(vec![
        Span::raw(format!(
          "{marker}{:<15}",
          super::truncate(&i.applicant_name, 14)
        )),
        Span::raw(format!("{:<12}", super::truncate(&i.region, 11))),
        Span::styled(
          format!("{:<10}", i.status.label()),
          Style::default().fg(status_color(i.status)),
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

fn draw_detail(f: &mut Frame, area: Rect, app: &App, row: &FranchiseInquiry) {
  let block = Block::default()
    .title(format!(" {} ", row.applicant_name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    super::field("phone", row.phone.clone()),
    super::field("email", row.email.clone().unwrap_or_else(|| "—".into())),
    super::field("region", row.region.clone()),
    super::field("budget", row.budget.clone().unwrap_or_else(|| "—".into())),
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

fn status_color(status: InquiryStatus) -> Color {
  match status {
    InquiryStatus::New => Color::Yellow,
    InquiryStatus::Contacted => Color::Cyan,
    InquiryStatus::Meeting => Color::Blue,
    InquiryStatus::Closed => Color::DarkGray,
  }
}
