//! The live dashboard read model — per-student status plus aggregate counts.
//!
//! A snapshot is recomputed from raw sessions and users on every poll cycle
//! and never persisted. "Today" is the operator's local calendar day,
//! re-evaluated on each call, so the midnight boundary is always current.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Role, StudySession, User};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Live state of one student. Assignment follows a strict priority: an open
/// session with detections outranks plain studying, which outranks today's
/// finished work, which outranks absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
  Studying,
  Drowsy,
  Completed,
  Offline,
}

impl StudentStatus {
  /// Short label used by list views and filters.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Studying => "studying",
      Self::Drowsy => "drowsy",
      Self::Completed => "completed",
      Self::Offline => "offline",
    }
  }
}

// ─── Derived entities ────────────────────────────────────────────────────────

/// One dashboard card. Ephemeral: rebuilt from scratch every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCard {
  pub user_id:             Uuid,
  pub name:                String,
  pub status:              StudentStatus,
  /// Subject of the in-progress session, if any.
  pub current_subject:     Option<String>,
  /// Id of the in-progress session, if any.
  pub current_record_id:   Option<Uuid>,
  /// Start of the in-progress session, if any.
  pub started_at:          Option<DateTime<Utc>>,
  /// Focused minutes across today's *closed* sessions. Open sessions never
  /// contribute, even when they began today.
  pub today_total_minutes: i64,
}

/// Aggregate counts for the stat tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  pub total_students:      usize,
  /// Students with an open session and no detections. Drowsy students are
  /// counted in `drowsiness_detected` instead — the buckets are disjoint.
  pub studying_now:        usize,
  pub drowsiness_detected: usize,
}

/// A data shape the backend promises not to produce, observed anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
  /// More than one open session for the same student today. The deriver
  /// keeps the first one found and ignores the rest.
  MultipleOpenSessions {
    user_id: Uuid,
    kept:    Uuid,
    ignored: Vec<Uuid>,
  },
}

/// The computed dashboard — never stored, always derived.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
  /// The `now` this snapshot was derived against.
  pub as_of:    DateTime<Local>,
  pub stats:    DashboardStats,
  pub students: Vec<StudentCard>,
  pub warnings: Vec<IntegrityWarning>,
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Derive per-student live status and aggregate counts from raw records.
///
/// Pure: deterministic for identical inputs and identical `now`; no side
/// effects. Cards come out in user input order. Only sessions whose local
/// start date is on or after `now`'s calendar day participate; a session
/// that crossed midnight belongs to the day it started.
pub fn derive_dashboard(
  sessions: &[StudySession],
  users: &[User],
  now: DateTime<Local>,
) -> DashboardSnapshot {
  let today = now.date_naive();

  let mut stats = DashboardStats::default();
  let mut students = Vec::new();
  let mut warnings = Vec::new();

  for user in users.iter().filter(|u| u.role == Role::Student) {
    let todays: Vec<&StudySession> = sessions
      .iter()
      .filter(|s| s.user_id == user.id && s.started_on_or_after(today))
      .collect();

    let mut open = todays.iter().copied().filter(|s| s.is_open());
    let current = open.next();
    let ignored: Vec<Uuid> = open.map(|s| s.id).collect();
    if let Some(kept) = current
      && !ignored.is_empty()
    {
      warnings.push(IntegrityWarning::MultipleOpenSessions {
        user_id: user.id,
        kept: kept.id,
        ignored,
      });
    }

    let today_total_minutes: i64 = todays
      .iter()
      .filter(|s| !s.is_open())
      .map(|s| s.pure_minutes)
      .sum();

    let status = match current {
      Some(s) if s.drowsiness_count > 0 => {
        stats.drowsiness_detected += 1;
        StudentStatus::Drowsy
      }
      Some(_) => {
        stats.studying_now += 1;
        StudentStatus::Studying
      }
      None if todays.iter().any(|s| !s.is_open()) => StudentStatus::Completed,
      None => StudentStatus::Offline,
    };

    students.push(StudentCard {
      user_id: user.id,
      name: user.name.clone(),
      status,
      current_subject: current.map(|s| s.subject.clone()),
      current_record_id: current.map(|s| s.id),
      started_at: current.map(|s| s.start_time),
      today_total_minutes,
    });
  }

  stats.total_students = students.len();

  DashboardSnapshot { as_of: now, stats, students, warnings }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
