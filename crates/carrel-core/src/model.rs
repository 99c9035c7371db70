//! Wire types shared with the study-space backend.
//!
//! The backend is a JavaScript REST service; payload fields are camelCase
//! on the wire, so the serde renames live on these types once and nothing
//! downstream has to think about it.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of account a user record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Staff,
  Admin,
}

/// A registered member of the study space. Owned by the backend; this tool
/// never mutates users. Only [`Role::Student`] participates in dashboard
/// derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:   Uuid,
  pub name: String,
  pub role: Role,
}

/// One study interval for a student — a "record" in operator speak.
/// Open (in progress) while `end_time` is `None`; the backend guarantees at
/// most one open session per student, and this crate flags rather than
/// enforces that precondition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
  pub id:               Uuid,
  pub user_id:          Uuid,
  pub subject:          String,
  pub start_time:       DateTime<Utc>,
  pub end_time:         Option<DateTime<Utc>>,
  /// Minutes of genuine focused study within the interval, as measured by
  /// the backend's focus tracking. Distinct from wall-clock duration.
  pub pure_minutes:     i64,
  pub drowsiness_count: u32,
}

impl StudySession {
  /// An open session is one still in progress (no end time yet).
  pub fn is_open(&self) -> bool {
    self.end_time.is_none()
  }

  /// Whether the session started on or after the given local calendar day.
  pub fn started_on_or_after(&self, day: NaiveDate) -> bool {
    self.start_time.with_timezone(&Local).date_naive() >= day
  }
}
