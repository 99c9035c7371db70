//! Duration rendering for list and card views.

use chrono::{DateTime, Utc};

/// Render a minute count as `"2h 05m"`, or just `"45m"` under an hour.
/// Negative inputs clamp to zero.
pub fn format_minutes(total: i64) -> String {
  let total = total.max(0);
  let hours = total / 60;
  let minutes = total % 60;
  if hours > 0 {
    format!("{hours}h {minutes:02}m")
  } else {
    format!("{minutes}m")
  }
}

/// Render the whole minutes elapsed since `start`. A `start` in the future
/// (clock skew between backend and console) renders as `"0m"`.
pub fn format_elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
  format_minutes((now - start).num_minutes())
}

/// Render an amount with thousands separators: `1234567` → `"1,234,567"`.
pub fn format_amount(amount: i64) -> String {
  let raw = amount.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
  for (i, c) in raw.chars().enumerate() {
    if i > 0 && (raw.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  if amount < 0 { format!("-{grouped}") } else { grouped }
}
