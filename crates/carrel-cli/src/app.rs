//! Application state machine and event dispatcher.

use std::collections::HashSet;

use anyhow::Result;
use carrel_client::{ApiClient, poll::PollOutcome, sample};
use carrel_core::{
  alerts::{AlertLog, DrowsinessAlert},
  consultation::{Consultation, ConsultationUpdate},
  dashboard::{DashboardSnapshot, StudentCard, StudentStatus},
  export,
  franchise::{FranchiseInquiry, InquiryUpdate},
  payment::{Payment, PaymentConfirmation},
};
use chrono::{DateTime, Duration, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tracing::warn;
use uuid::Uuid;

/// How long a drowsiness toast stays on screen.
const ALERT_TTL_SECS: i64 = 8;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Dashboard,
  Consultations,
  Franchise,
  Payments,
}

/// What keyboard input currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
  Normal,
  /// Typing into the fuzzy filter.
  Search,
  /// Editing the memo of the row under the cursor.
  Memo,
  /// Pasting a payment success-callback URL.
  Confirm,
}

// ─── Listing ──────────────────────────────────────────────────────────────────

/// One back-office list plus its provenance.
pub struct Listing<T> {
  pub rows:   Vec<T>,
  /// At least one fetch attempt has completed.
  pub loaded: bool,
  /// Rows are the canned offline fallback, not live records.
  pub sample: bool,
}

impl<T> Default for Listing<T> {
  fn default() -> Self {
    Self { rows: Vec::new(), loaded: false, sample: false }
  }
}

impl<T> Listing<T> {
  fn live(&mut self, rows: Vec<T>) {
    self.rows = rows;
    self.loaded = true;
    self.sample = false;
  }

  fn fallback(&mut self, rows: Vec<T>) {
    self.rows = rows;
    self.loaded = true;
    self.sample = true;
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current tab.
  pub screen: Screen,
  pub input:  InputMode,

  /// Latest applied snapshot. Stays on screen through outages; the OFFLINE
  /// badge says it may be stale.
  pub dashboard:       Option<DashboardSnapshot>,
  /// Highest poll seq applied so far; outcomes at or below it are stale.
  pub applied_seq:     u64,
  /// The most recent poll cycle failed.
  pub offline:         bool,
  pub last_poll_error: Option<String>,

  pub consultations: Listing<Consultation>,
  pub franchise:     Listing<FranchiseInquiry>,
  pub payments:      Listing<Payment>,
  /// Rows whose last write failed and whose state exists only locally.
  pub unsynced:      HashSet<Uuid>,

  /// Fuzzy filter for the current screen (fed while in `Search` mode).
  pub filter:       String,
  /// Dashboard-only: show cards with this current subject.
  pub dash_subject: Option<String>,
  /// Dashboard-only: show cards with this status.
  pub dash_status:  Option<StudentStatus>,
  /// Scroll position within the visible dashboard cards.
  pub dash_scroll:  usize,

  /// Cursor position within the current screen's *visible* rows.
  pub list_cursor: usize,
  /// Row opened in the detail pane, if any.
  pub detail:      Option<Uuid>,

  /// Line being edited in `Memo` or `Confirm` mode.
  pub draft: String,

  pub alerts: AlertLog,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  started_authenticated: bool,
  pub client: ApiClient,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    let started_authenticated = client.session().is_authenticated();
    Self {
      screen: Screen::Dashboard,
      input: InputMode::Normal,
      dashboard: None,
      applied_seq: 0,
      offline: false,
      last_poll_error: None,
      consultations: Listing::default(),
      franchise: Listing::default(),
      payments: Listing::default(),
      unsynced: HashSet::new(),
      filter: String::new(),
      dash_subject: None,
      dash_status: None,
      dash_scroll: 0,
      list_cursor: 0,
      detail: None,
      draft: String::new(),
      alerts: AlertLog::new(Duration::seconds(ALERT_TTL_SECS)),
      status_msg: String::new(),
      started_authenticated,
      client,
    }
  }

  // ── Background feeds ──────────────────────────────────────────────────────

  /// Apply one poll outcome. Outcomes carry a sequence number; anything at
  /// or below the last applied one is stale and dropped, so a slow cycle
  /// can never overwrite a fresher snapshot.
  pub fn apply_poll(&mut self, outcome: PollOutcome) {
    if outcome.seq <= self.applied_seq {
      return;
    }
    self.applied_seq = outcome.seq;
    match outcome.result {
      Ok(snapshot) => {
        self.dashboard = Some(snapshot);
        self.offline = false;
        self.last_poll_error = None;
      }
      Err(e) => {
        self.offline = true;
        self.last_poll_error = Some(e.to_string());
      }
    }
  }

  pub fn apply_alert(&mut self, alert: DrowsinessAlert, now: DateTime<Utc>) {
    self.alerts.push(alert, now);
  }

  /// Housekeeping run once per frame.
  pub fn tick(&mut self, now: DateTime<Utc>) {
    self.alerts.prune(now);
  }

  /// True once a session that started with a token has lost it.
  pub fn session_expired(&self) -> bool {
    self.started_authenticated && !self.client.session().is_authenticated()
  }

  // ── Visible rows ──────────────────────────────────────────────────────────

  /// Dashboard cards after view filters. Filters shape what is *shown*;
  /// the stat tiles always come from the full snapshot.
  pub fn visible_students(&self) -> Vec<&StudentCard> {
    let Some(snapshot) = &self.dashboard else {
      return Vec::new();
    };
    let matcher = SkimMatcherV2::default();
    snapshot
      .students
      .iter()
      .filter(|c| self.dash_status.is_none_or(|s| c.status == s))
      .filter(|c| match &self.dash_subject {
        Some(subject) => c.current_subject.as_deref() == Some(subject.as_str()),
        None => true,
      })
      .filter(|c| {
        self.filter.is_empty()
          || matcher.fuzzy_match(&c.name, &self.filter).is_some()
      })
      .collect()
  }

  pub fn visible_consultations(&self) -> Vec<&Consultation> {
    let matcher = SkimMatcherV2::default();
    self
      .consultations
      .rows
      .iter()
      .filter(|c| {
        self.filter.is_empty()
          || matcher.fuzzy_match(&c.student_name, &self.filter).is_some()
          || matcher.fuzzy_match(&c.phone, &self.filter).is_some()
      })
      .collect()
  }

  pub fn visible_franchise(&self) -> Vec<&FranchiseInquiry> {
    let matcher = SkimMatcherV2::default();
    self
      .franchise
      .rows
      .iter()
      .filter(|i| {
        self.filter.is_empty()
          || matcher.fuzzy_match(&i.applicant_name, &self.filter).is_some()
          || matcher.fuzzy_match(&i.region, &self.filter).is_some()
      })
      .collect()
  }

  pub fn visible_payments(&self) -> Vec<&Payment> {
    let matcher = SkimMatcherV2::default();
    self
      .payments
      .rows
      .iter()
      .filter(|p| {
        self.filter.is_empty()
          || matcher.fuzzy_match(&p.customer_name, &self.filter).is_some()
          || matcher.fuzzy_match(&p.order_id, &self.filter).is_some()
      })
      .collect()
  }

  pub fn cursor_consultation(&self) -> Option<&Consultation> {
    self.visible_consultations().get(self.list_cursor).copied()
  }

  pub fn cursor_franchise(&self) -> Option<&FranchiseInquiry> {
    self.visible_franchise().get(self.list_cursor).copied()
  }

  pub fn cursor_payment(&self) -> Option<&Payment> {
    self.visible_payments().get(self.list_cursor).copied()
  }

  // ── Dashboard filters ─────────────────────────────────────────────────────

  /// Distinct current subjects in the snapshot, for the subject cycle.
  pub fn subjects_in_view(&self) -> Vec<String> {
    let mut subjects: Vec<String> = self
      .dashboard
      .iter()
      .flat_map(|d| d.students.iter())
      .filter_map(|c| c.current_subject.clone())
      .collect();
    subjects.sort();
    subjects.dedup();
    subjects
  }

  fn cycle_subject_filter(&mut self) {
    let subjects = self.subjects_in_view();
    self.dash_subject = match &self.dash_subject {
      None => subjects.first().cloned(),
      Some(current) => match subjects.iter().position(|s| s == current) {
        Some(i) if i + 1 < subjects.len() => Some(subjects[i + 1].clone()),
        _ => None,
      },
    };
  }

  fn cycle_status_filter(&mut self) {
    self.dash_status = match self.dash_status {
      None => Some(StudentStatus::Studying),
      Some(StudentStatus::Studying) => Some(StudentStatus::Drowsy),
      Some(StudentStatus::Drowsy) => Some(StudentStatus::Completed),
      Some(StudentStatus::Completed) => Some(StudentStatus::Offline),
      Some(StudentStatus::Offline) => None,
    };
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  async fn refresh_consultations(&mut self) {
    self.status_msg = "Loading consultations…".into();
    match self.client.list_consultations().await {
      Ok(rows) => {
        self.consultations.live(rows);
        self.status_msg.clear();
      }
      Err(e) => {
        warn!(error = %e, "consultation fetch failed, using sample rows");
        self.consultations.fallback(sample::consultations());
        self.status_msg = format!("Offline — showing sample rows ({e})");
      }
    }
    self.list_cursor = 0;
    self.detail = None;
  }

  async fn refresh_franchise(&mut self) {
    self.status_msg = "Loading franchise inquiries…".into();
    match self.client.list_franchise_inquiries().await {
      Ok(rows) => {
        self.franchise.live(rows);
        self.status_msg.clear();
      }
      Err(e) => {
        warn!(error = %e, "franchise fetch failed, using sample rows");
        self.franchise.fallback(sample::franchise_inquiries());
        self.status_msg = format!("Offline — showing sample rows ({e})");
      }
    }
    self.list_cursor = 0;
    self.detail = None;
  }

  async fn refresh_payments(&mut self) {
    self.status_msg = "Loading payments…".into();
    match self.client.list_payments().await {
      Ok(rows) => {
        self.payments.live(rows);
        self.status_msg.clear();
      }
      Err(e) => {
        warn!(error = %e, "payment fetch failed, using sample rows");
        self.payments.fallback(sample::payments());
        self.status_msg = format!("Offline — showing sample rows ({e})");
      }
    }
    self.list_cursor = 0;
    self.detail = None;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    match self.input {
      InputMode::Search => return self.handle_search_key(key),
      InputMode::Memo => return self.handle_memo_key(key).await,
      InputMode::Confirm => return self.handle_confirm_key(key).await,
      InputMode::Normal => {}
    }

    // Tab switching and toast dismissal work on every screen.
    match key.code {
      KeyCode::Char('1') => {
        self.switch_screen(Screen::Dashboard).await;
        return Ok(true);
      }
      KeyCode::Char('2') => {
        self.switch_screen(Screen::Consultations).await;
        return Ok(true);
      }
      KeyCode::Char('3') => {
        self.switch_screen(Screen::Franchise).await;
        return Ok(true);
      }
      KeyCode::Char('4') => {
        self.switch_screen(Screen::Payments).await;
        return Ok(true);
      }
      KeyCode::Char('d') => {
        self.alerts.dismiss_oldest();
        return Ok(true);
      }
      _ => {}
    }

    match self.screen {
      Screen::Dashboard => self.handle_dashboard_key(key),
      Screen::Consultations => self.handle_consultations_key(key).await,
      Screen::Franchise => self.handle_franchise_key(key).await,
      Screen::Payments => self.handle_payments_key(key).await,
    }
  }

  async fn switch_screen(&mut self, screen: Screen) {
    if self.screen != screen {
      self.screen = screen;
      self.list_cursor = 0;
      self.detail = None;
      self.filter.clear();
      self.status_msg.clear();
    }
    // First visit loads the list; after that `r` refreshes explicitly.
    match screen {
      Screen::Consultations if !self.consultations.loaded => {
        self.refresh_consultations().await;
      }
      Screen::Franchise if !self.franchise.loaded => {
        self.refresh_franchise().await;
      }
      Screen::Payments if !self.payments.loaded => {
        self.refresh_payments().await;
      }
      _ => {}
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.input = InputMode::Normal;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.input = InputMode::Normal;
        self.list_cursor = 0;
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_memo_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.input = InputMode::Normal;
        self.draft.clear();
      }
      KeyCode::Enter => self.save_memo().await,
      KeyCode::Backspace => {
        self.draft.pop();
      }
      KeyCode::Char(c) => self.draft.push(c),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.input = InputMode::Normal;
        self.draft.clear();
      }
      KeyCode::Enter => self.submit_confirmation().await,
      KeyCode::Backspace => {
        self.draft.pop();
      }
      KeyCode::Char(c) => self.draft.push(c),
      _ => {}
    }
    Ok(true)
  }

  fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_students().len();
        if len > 0 && self.dash_scroll + 1 < len {
          self.dash_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.dash_scroll > 0 {
          self.dash_scroll -= 1;
        }
      }

      KeyCode::Char('s') => {
        self.cycle_subject_filter();
        self.dash_scroll = 0;
      }
      KeyCode::Char('f') => {
        self.cycle_status_filter();
        self.dash_scroll = 0;
      }
      KeyCode::Char('/') => {
        self.input = InputMode::Search;
        self.filter.clear();
        self.dash_scroll = 0;
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_consultations_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_consultations().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      KeyCode::Enter => {
        self.detail = self.cursor_consultation().map(|c| c.id);
      }
      KeyCode::Esc => {
        self.detail = None;
      }

      KeyCode::Char('/') => {
        self.input = InputMode::Search;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('r') => self.refresh_consultations().await,
      KeyCode::Char('u') => self.advance_consultation().await,
      KeyCode::Char('m') => self.open_memo(),
      KeyCode::Char('e') => self.export_current(),

      _ => {}
    }
    Ok(true)
  }

  async fn handle_franchise_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_franchise().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      KeyCode::Enter => {
        self.detail = self.cursor_franchise().map(|i| i.id);
      }
      KeyCode::Esc => {
        self.detail = None;
      }

      KeyCode::Char('/') => {
        self.input = InputMode::Search;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('r') => self.refresh_franchise().await,
      KeyCode::Char('u') => self.advance_franchise().await,
      KeyCode::Char('m') => self.open_memo(),
      KeyCode::Char('e') => self.export_current(),

      _ => {}
    }
    Ok(true)
  }

  async fn handle_payments_key(&mut self, key: KeyEvent) -> Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_payments().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      KeyCode::Enter => {
        self.detail = self.cursor_payment().map(|p| p.id);
      }
      KeyCode::Esc => {
        self.detail = None;
      }

      KeyCode::Char('/') => {
        self.input = InputMode::Search;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Char('r') => self.refresh_payments().await,
      KeyCode::Char('c') => {
        self.input = InputMode::Confirm;
        self.draft.clear();
      }
      KeyCode::Char('e') => self.export_current(),

      _ => {}
    }
    Ok(true)
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  async fn advance_consultation(&mut self) {
    let Some((id, next)) =
      self.cursor_consultation().map(|c| (c.id, c.status.next()))
    else {
      return;
    };

    if self.consultations.sample {
      // Nothing to sync against; just step the local row.
      if let Some(row) =
        self.consultations.rows.iter_mut().find(|r| r.id == id)
      {
        row.status = next;
      }
      return;
    }

    let update =
      ConsultationUpdate { status: Some(next), ..Default::default() };
    match self.client.update_consultation(id, &update).await {
      Ok(updated) => {
        if let Some(row) =
          self.consultations.rows.iter_mut().find(|r| r.id == id)
        {
          *row = updated;
        }
        self.unsynced.remove(&id);
        self.status_msg = format!("Status → {next}");
      }
      Err(e) => {
        warn!(error = %e, %id, "consultation update failed, keeping local copy");
        if let Some(row) =
          self.consultations.rows.iter_mut().find(|r| r.id == id)
        {
          row.status = next;
        }
        self.unsynced.insert(id);
        self.status_msg = format!("Saved locally, not synced ({e})");
      }
    }
  }

  async fn advance_franchise(&mut self) {
    let Some((id, next)) =
      self.cursor_franchise().map(|i| (i.id, i.status.next()))
    else {
      return;
    };

    if self.franchise.sample {
      if let Some(row) = self.franchise.rows.iter_mut().find(|r| r.id == id) {
        row.status = next;
      }
      return;
    }

    let update = InquiryUpdate { status: Some(next), ..Default::default() };
    match self.client.update_franchise_inquiry(id, &update).await {
      Ok(updated) => {
        if let Some(row) =
          self.franchise.rows.iter_mut().find(|r| r.id == id)
        {
          *row = updated;
        }
        self.unsynced.remove(&id);
        self.status_msg = format!("Status → {next}");
      }
      Err(e) => {
        warn!(error = %e, %id, "franchise update failed, keeping local copy");
        if let Some(row) =
          self.franchise.rows.iter_mut().find(|r| r.id == id)
        {
          row.status = next;
        }
        self.unsynced.insert(id);
        self.status_msg = format!("Saved locally, not synced ({e})");
      }
    }
  }

  fn open_memo(&mut self) {
    let seed = match self.screen {
      Screen::Consultations => self
        .cursor_consultation()
        .map(|c| c.memo.clone().unwrap_or_default()),
      Screen::Franchise => self
        .cursor_franchise()
        .map(|i| i.memo.clone().unwrap_or_default()),
      _ => return,
    };
    let Some(seed) = seed else { return };
    self.draft = seed;
    self.input = InputMode::Memo;
  }

  async fn save_memo(&mut self) {
    let memo = self.draft.trim().to_owned();
    self.draft.clear();
    self.input = InputMode::Normal;

    match self.screen {
      Screen::Consultations => {
        let Some(id) = self.cursor_consultation().map(|c| c.id) else {
          return;
        };
        if self.consultations.sample {
          if let Some(row) =
            self.consultations.rows.iter_mut().find(|r| r.id == id)
          {
            row.memo = Some(memo);
          }
          return;
        }
        let update =
          ConsultationUpdate { memo: Some(memo.clone()), ..Default::default() };
        match self.client.update_consultation(id, &update).await {
          Ok(updated) => {
            if let Some(row) =
              self.consultations.rows.iter_mut().find(|r| r.id == id)
            {
              *row = updated;
            }
            self.unsynced.remove(&id);
            self.status_msg = "Memo saved".into();
          }
          Err(e) => {
            warn!(error = %e, %id, "memo update failed, keeping local copy");
            if let Some(row) =
              self.consultations.rows.iter_mut().find(|r| r.id == id)
            {
              row.memo = Some(memo);
            }
            self.unsynced.insert(id);
            self.status_msg = format!("Saved locally, not synced ({e})");
          }
        }
      }
      Screen::Franchise => {
        let Some(id) = self.cursor_franchise().map(|i| i.id) else {
          return;
        };
        if self.franchise.sample {
          if let Some(row) =
            self.franchise.rows.iter_mut().find(|r| r.id == id)
          {
            row.memo = Some(memo);
          }
          return;
        }
        let update =
          InquiryUpdate { memo: Some(memo.clone()), ..Default::default() };
        match self.client.update_franchise_inquiry(id, &update).await {
          Ok(updated) => {
            if let Some(row) =
              self.franchise.rows.iter_mut().find(|r| r.id == id)
            {
              *row = updated;
            }
            self.unsynced.remove(&id);
            self.status_msg = "Memo saved".into();
          }
          Err(e) => {
            warn!(error = %e, %id, "memo update failed, keeping local copy");
            if let Some(row) =
              self.franchise.rows.iter_mut().find(|r| r.id == id)
            {
              row.memo = Some(memo);
            }
            self.unsynced.insert(id);
            self.status_msg = format!("Saved locally, not synced ({e})");
          }
        }
      }
      _ => {}
    }
  }

  async fn submit_confirmation(&mut self) {
    let pasted = self.draft.trim().to_owned();
    self.draft.clear();
    self.input = InputMode::Normal;
    if pasted.is_empty() {
      return;
    }

    let confirmation = match PaymentConfirmation::from_callback(&pasted) {
      Ok(c) => c,
      Err(e) => {
        self.status_msg = format!("Not a callback URL: {e}");
        return;
      }
    };
    match self.client.confirm_payment(&confirmation).await {
      Ok(paid) => {
        self.refresh_payments().await;
        self.status_msg =
          format!("Confirmed {} — {}", paid.order_id, paid.status);
      }
      Err(e) => {
        warn!(error = %e, "payment confirmation failed");
        self.status_msg = format!("Confirm failed: {e}");
      }
    }
  }

  /// Export the current screen's full list to `./<list>-<YYYYMMDD>.csv`.
  /// The export always covers every row, not just the filtered view.
  fn export_current(&mut self) {
    let (kind, built, count) = match self.screen {
      Screen::Consultations => (
        "consultations",
        export::consultations_csv(&self.consultations.rows),
        self.consultations.rows.len(),
      ),
      Screen::Franchise => (
        "franchise",
        export::franchise_csv(&self.franchise.rows),
        self.franchise.rows.len(),
      ),
      Screen::Payments => (
        "payments",
        export::payments_csv(&self.payments.rows),
        self.payments.rows.len(),
      ),
      Screen::Dashboard => return,
    };
    let csv = match built {
      Ok(csv) => csv,
      Err(e) => {
        self.status_msg = format!("Export failed: {e}");
        return;
      }
    };
    let name = export_filename(kind, Local::now());
    match std::fs::write(&name, csv) {
      Ok(()) => self.status_msg = format!("Exported {count} rows to {name}"),
      Err(e) => self.status_msg = format!("Export failed: {e}"),
    }
  }
}

fn export_filename(kind: &str, now: DateTime<Local>) -> String {
  format!("{kind}-{}.csv", now.format("%Y%m%d"))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
