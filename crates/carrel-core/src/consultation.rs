//! Consultation requests from the public site's booking form.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage of a consultation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
  Pending,
  Contacted,
  Scheduled,
  Completed,
  Cancelled,
}

impl ConsultationStatus {
  /// Next stage in the cycle the console steps through. Wraps around so a
  /// mis-keyed advance is always recoverable.
  pub fn next(&self) -> Self {
    match self {
      Self::Pending => Self::Contacted,
      Self::Contacted => Self::Scheduled,
      Self::Scheduled => Self::Completed,
      Self::Completed => Self::Cancelled,
      Self::Cancelled => Self::Pending,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Contacted => "contacted",
      Self::Scheduled => "scheduled",
      Self::Completed => "completed",
      Self::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for ConsultationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A booking-form submission, as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
  pub id:             Uuid,
  pub student_name:   String,
  pub phone:          String,
  /// School grade as free text ("middle 2", "high 1"). Optional on the form.
  pub grade:          Option<String>,
  pub preferred_date: Option<NaiveDate>,
  pub message:        Option<String>,
  pub status:         ConsultationStatus,
  /// Operator-private note, never shown to the requester.
  pub memo:           Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Partial update sent by the console. Absent fields are left untouched by
/// the backend, so both are optional and skipped when unset.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<ConsultationStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub memo:   Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_cycle_visits_every_stage_and_wraps() {
    let mut seen = vec![ConsultationStatus::Pending];
    let mut s = ConsultationStatus::Pending;
    for _ in 0..4 {
      s = s.next();
      seen.push(s);
    }
    assert_eq!(seen.len(), 5);
    assert_eq!(s.next(), ConsultationStatus::Pending);
  }

  #[test]
  fn update_skips_unset_fields() {
    let update = ConsultationUpdate {
      status: Some(ConsultationStatus::Contacted),
      ..Default::default()
    };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "contacted" }));
  }
}
