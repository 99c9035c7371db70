//! Drowsiness alert toasts.
//!
//! The backend pushes an event every time the detector fires; the console
//! keeps a short-lived log of them so the operator sees a stack of toasts
//! that age out on their own. Identical alerts are kept, not deduplicated:
//! two detections for the same student are two separate events.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One detection event as pushed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrowsinessAlert {
  pub student_name: String,
  /// The study session the detection belongs to.
  pub record_id:    Uuid,
}

/// An alert annotated with its arrival, for display and expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertToast {
  pub id:          u64,
  pub alert:       DrowsinessAlert,
  pub received_at: DateTime<Utc>,
}

/// Arrival-ordered log of live toasts.
#[derive(Debug)]
pub struct AlertLog {
  ttl:     Duration,
  next_id: u64,
  toasts:  Vec<AlertToast>,
}

impl AlertLog {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, next_id: 0, toasts: Vec::new() }
  }

  /// Append an alert and return the id assigned to its toast.
  pub fn push(&mut self, alert: DrowsinessAlert, now: DateTime<Utc>) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    self.toasts.push(AlertToast { id, alert, received_at: now });
    id
  }

  /// Remove the toast with the given id, if it is still live.
  pub fn dismiss(&mut self, id: u64) {
    self.toasts.retain(|t| t.id != id);
  }

  /// Remove the oldest live toast and return its id.
  pub fn dismiss_oldest(&mut self) -> Option<u64> {
    if self.toasts.is_empty() {
      return None;
    }
    let t = self.toasts.remove(0);
    Some(t.id)
  }

  /// Drop toasts older than the ttl. A toast exactly at the ttl expires.
  pub fn prune(&mut self, now: DateTime<Utc>) {
    let ttl = self.ttl;
    self.toasts.retain(|t| now - t.received_at < ttl);
  }

  /// Live toasts, oldest first.
  pub fn toasts(&self) -> &[AlertToast] {
    &self.toasts
  }

  pub fn is_empty(&self) -> bool {
    self.toasts.is_empty()
  }

  pub fn len(&self) -> usize {
    self.toasts.len()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 9, 14, 30, sec).unwrap()
  }

  fn alert(name: &str) -> DrowsinessAlert {
    DrowsinessAlert { student_name: name.into(), record_id: Uuid::new_v4() }
  }

  #[test]
  fn toasts_come_back_in_arrival_order() {
    let mut log = AlertLog::new(Duration::seconds(8));
    log.push(alert("Avery Lee"), at(0));
    log.push(alert("Jules Moreno"), at(1));

    let names: Vec<&str> =
      log.toasts().iter().map(|t| t.alert.student_name.as_str()).collect();
    assert_eq!(names, vec!["Avery Lee", "Jules Moreno"]);
  }

  #[test]
  fn repeated_alerts_are_kept_as_separate_toasts() {
    let mut log = AlertLog::new(Duration::seconds(8));
    let a = alert("Avery Lee");
    let first = log.push(a.clone(), at(0));
    let second = log.push(a, at(2));

    assert_ne!(first, second);
    assert_eq!(log.len(), 2);
  }

  #[test]
  fn prune_expires_at_the_ttl_boundary() {
    let mut log = AlertLog::new(Duration::seconds(8));
    log.push(alert("Avery Lee"), at(0));
    log.push(alert("Jules Moreno"), at(5));

    log.prune(at(7));
    assert_eq!(log.len(), 2);

    // Exactly ttl old: expired.
    log.prune(at(8));
    assert_eq!(log.len(), 1);
    assert_eq!(log.toasts()[0].alert.student_name, "Jules Moreno");
  }

  #[test]
  fn dismiss_removes_only_the_given_toast() {
    let mut log = AlertLog::new(Duration::seconds(8));
    let first = log.push(alert("Avery Lee"), at(0));
    log.push(alert("Jules Moreno"), at(1));

    log.dismiss(first);
    assert_eq!(log.len(), 1);
    assert_eq!(log.toasts()[0].alert.student_name, "Jules Moreno");

    // Dismissing an expired id is a no-op.
    log.dismiss(first);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn dismiss_oldest_pops_from_the_front() {
    let mut log = AlertLog::new(Duration::seconds(8));
    let first = log.push(alert("Avery Lee"), at(0));
    log.push(alert("Jules Moreno"), at(1));

    assert_eq!(log.dismiss_oldest(), Some(first));
    assert_eq!(log.len(), 1);

    log.dismiss_oldest();
    assert_eq!(log.dismiss_oldest(), None);
  }
}
