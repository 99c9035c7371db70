//! Franchise inquiries from the public site's partnership form.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage of a franchise inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
  New,
  Contacted,
  Meeting,
  Closed,
}

impl InquiryStatus {
  /// Next stage in the cycle the console steps through, wrapping at the end.
  pub fn next(&self) -> Self {
    match self {
      Self::New => Self::Contacted,
      Self::Contacted => Self::Meeting,
      Self::Meeting => Self::Closed,
      Self::Closed => Self::New,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Contacted => "contacted",
      Self::Meeting => "meeting",
      Self::Closed => "closed",
    }
  }
}

impl fmt::Display for InquiryStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A partnership-form submission, as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseInquiry {
  pub id:             Uuid,
  pub applicant_name: String,
  pub phone:          String,
  pub email:          Option<String>,
  /// Candidate region as free text ("Mapo-gu", "Bundang").
  pub region:         String,
  pub budget:         Option<String>,
  pub message:        Option<String>,
  pub status:         InquiryStatus,
  /// Operator-private note, never shown to the applicant.
  pub memo:           Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Partial update sent by the console; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<InquiryStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub memo:   Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_cycle_visits_every_stage_and_wraps() {
    let mut s = InquiryStatus::New;
    let mut seen = vec![s];
    for _ in 0..3 {
      s = s.next();
      seen.push(s);
    }
    assert_eq!(seen.len(), 4);
    assert_eq!(s.next(), InquiryStatus::New);
  }

  #[test]
  fn memo_only_update_serializes_just_the_memo() {
    let update = InquiryUpdate {
      memo: Some("call after 6pm".into()),
      ..Default::default()
    };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({ "memo": "call after 6pm" }));
  }
}
