//! Payments pane — list and detail.

use carrel_core::{
  format::format_amount,
  payment::{Payment, PaymentStatus},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the payments screen into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  draw_list(f, cols[0], app);

  let open = app
    .detail
    .and_then(|id| app.payments.rows.iter().find(|p| p.id == id));
  match open {
    Some(row) => draw_detail(f, cols[1], row),
    None => {
      super::draw_empty_detail(f, cols[1], "Select a payment and press Enter.")
    }
  }
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let visible = app.visible_payments();
  let total = app.payments.rows.len();

  let mut title = if visible.len() == total {
    format!(" Payments ({total}) ")
  } else {
    format!(" Payments ({}/{total}) ", visible.len())
  };
  if app.payments.sample {
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
    .map(|p| {
      ListItem::new(Line::from(vec![
        Span::raw(format!(" {:<19}", super::truncate(&p.order_id, 18))),
        Span::raw(format!("{:>11}  ", format_amount(p.amount))),
        Span::styled(
          p.status.label().to_owned(),
          Style::default().fg(status_color(p.status)),
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

fn draw_detail(f: &mut Frame, area: Rect, row: &Payment) {
  let block = Block::default()
    .title(format!(" {} ", row.order_id))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = vec![
    super::field("customer", row.customer_name.clone()),
    super::field("plan", row.plan.clone()),
    super::field("amount", format_amount(row.amount)),
    super::field("status", row.status.label().to_owned()),
    super::field(
      "key",
      row.payment_key.clone().unwrap_or_else(|| "—".into()),
    ),
    super::field(
      "requested",
      row.requested_at.format("%Y-%m-%d %H:%M").to_string(),
    ),
    super::field(
      "approved",
      row
        .approved_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".into()),
    ),
  ];

  f.render_widget(Paragraph::new(lines), inner);
}

fn status_color(status: PaymentStatus) -> Color {
  match status {
    PaymentStatus::Done => Color::Green,
    PaymentStatus::Ready | PaymentStatus::InProgress => Color::Yellow,
    PaymentStatus::Canceled | PaymentStatus::Aborted | PaymentStatus::Expired => {
      Color::DarkGray
    }
  }
}
