//! Async HTTP client wrapping the carrel JSON API.

use std::time::Duration;

use carrel_core::{
  consultation::{Consultation, ConsultationUpdate},
  dashboard::{DashboardSnapshot, derive_dashboard},
  franchise::{FranchiseInquiry, InquiryUpdate},
  model::{StudySession, User},
  payment::{Payment, PaymentConfirmation},
};
use chrono::Local;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
  error::{ApiError, ApiResult},
  session::AdminSession,
};

/// Connection settings for the carrel API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the carrel JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and the
/// [`AdminSession`] is shared, so the poller, the alert feed and foreground
/// actions all see the same credentials.
#[derive(Clone)]
pub struct ApiClient {
  client:  Client,
  /// Separate connection for the SSE stream: a total timeout would cut a
  /// healthy long-lived stream, so this one only bounds the connect phase.
  stream:  Client,
  config:  ApiConfig,
  session: AdminSession,
}

impl ApiClient {
  pub fn new(config: ApiConfig, session: AdminSession) -> ApiResult<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    let stream = Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { client, stream, config, session })
  }

  pub fn session(&self) -> &AdminSession {
    &self.session
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    match self.session.token() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Map a 401 to [`ApiError::Unauthorized`], invalidating the shared
  /// session, and any other non-2xx to [`ApiError::Status`].
  fn check(
    &self,
    method: &'static str,
    path: &str,
    resp: Response,
  ) -> ApiResult<Response> {
    if resp.status() == StatusCode::UNAUTHORIZED {
      self.session.invalidate();
      return Err(ApiError::Unauthorized);
    }
    if !resp.status().is_success() {
      return Err(ApiError::Status {
        method,
        path: path.to_owned(),
        status: resp.status(),
      });
    }
    Ok(resp)
  }

  async fn decode<T: DeserializeOwned>(
    path: &str,
    resp: Response,
  ) -> ApiResult<T> {
    resp.json().await.map_err(|source| ApiError::Decode {
      path: path.to_owned(),
      source,
    })
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
    let resp = self.auth(self.client.get(self.url(path))).send().await?;
    let resp = self.check("GET", path, resp)?;
    Self::decode(path, resp).await
  }

  async fn patch_json<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> ApiResult<T> {
    let resp = self
      .auth(self.client.patch(self.url(path)))
      .json(body)
      .send()
      .await?;
    let resp = self.check("PATCH", path, resp)?;
    Self::decode(path, resp).await
  }

  async fn post_json<B: Serialize, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> ApiResult<T> {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await?;
    let resp = self.check("POST", path, resp)?;
    Self::decode(path, resp).await
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/users/`
  pub async fn list_users(&self) -> ApiResult<Vec<User>> {
    self.get_json("/users/").await
  }

  /// `GET /api/sessions/`
  pub async fn list_sessions(&self) -> ApiResult<Vec<StudySession>> {
    self.get_json("/sessions/").await
  }

  /// Fetch sessions and users concurrently and derive a fresh snapshot
  /// against the local clock.
  pub async fn fetch_dashboard(&self) -> ApiResult<DashboardSnapshot> {
    let (sessions, users) =
      tokio::try_join!(self.list_sessions(), self.list_users())?;
    Ok(derive_dashboard(&sessions, &users, Local::now()))
  }

  // ── Consultations ─────────────────────────────────────────────────────────

  /// `GET /api/consultations/`
  pub async fn list_consultations(&self) -> ApiResult<Vec<Consultation>> {
    self.get_json("/consultations/").await
  }

  /// `PATCH /api/consultations/{id}/`
  pub async fn update_consultation(
    &self,
    id: Uuid,
    update: &ConsultationUpdate,
  ) -> ApiResult<Consultation> {
    self.patch_json(&format!("/consultations/{id}/"), update).await
  }

  // ── Franchise ─────────────────────────────────────────────────────────────

  /// `GET /api/franchises/`
  pub async fn list_franchise_inquiries(
    &self,
  ) -> ApiResult<Vec<FranchiseInquiry>> {
    self.get_json("/franchises/").await
  }

  /// `PATCH /api/franchises/{id}/`
  pub async fn update_franchise_inquiry(
    &self,
    id: Uuid,
    update: &InquiryUpdate,
  ) -> ApiResult<FranchiseInquiry> {
    self.patch_json(&format!("/franchises/{id}/"), update).await
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  /// `GET /api/payments/`
  pub async fn list_payments(&self) -> ApiResult<Vec<Payment>> {
    self.get_json("/payments/").await
  }

  /// `POST /api/payments/confirm/`
  pub async fn confirm_payment(
    &self,
    confirmation: &PaymentConfirmation,
  ) -> ApiResult<Payment> {
    self.post_json("/payments/confirm/", confirmation).await
  }

  // ── Alerts ────────────────────────────────────────────────────────────────

  /// `GET /api/alerts/stream/` — the raw SSE response, consumed by
  /// [`crate::events::spawn_alert_feed`].
  pub(crate) async fn open_alert_stream(&self) -> ApiResult<Response> {
    let path = "/alerts/stream/";
    let resp = self
      .auth(self.stream.get(self.url(path)))
      .header("Accept", "text/event-stream")
      .send()
      .await?;
    self.check("GET", path, resp)
  }
}
