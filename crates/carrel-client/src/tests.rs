//! Integration tests for `ApiClient` against an in-process axum fixture.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Json, Router,
  extract::Path,
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
  routing::{get, patch, post},
};
use carrel_core::{
  consultation::{ConsultationStatus, ConsultationUpdate},
  dashboard::StudentStatus,
  franchise::InquiryUpdate,
  payment::PaymentConfirmation,
};
use chrono::Utc;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
  client::{ApiClient, ApiConfig},
  error::ApiError,
  events::spawn_alert_feed,
  poll::{PollOptions, spawn_dashboard_poller},
  session::AdminSession,
};

async fn spawn_server(app: Router) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("bind fixture listener");
  let addr = listener.local_addr().expect("fixture addr");
  tokio::spawn(async move {
    axum::serve(listener, app).await.expect("fixture server");
  });
  format!("http://{addr}")
}

fn client(base_url: &str, session: AdminSession) -> ApiClient {
  ApiClient::new(ApiConfig { base_url: base_url.to_owned() }, session)
    .expect("build client")
}

fn fast_poll() -> PollOptions {
  PollOptions {
    interval: Duration::from_millis(50),
    budget:   Duration::from_secs(2),
  }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_sessions_decodes_the_wire_shape() {
  let sid = Uuid::new_v4();
  let uid = Uuid::new_v4();
  let start = Utc::now();
  let app = Router::new().route(
    "/api/sessions/",
    get(move || async move {
      Json(json!([{
        "id": sid,
        "userId": uid,
        "subject": "math",
        "startTime": start,
        "endTime": null,
        "pureMinutes": 0,
        "drowsinessCount": 2,
      }]))
    }),
  );
  let base = spawn_server(app).await;

  let sessions = client(&base, AdminSession::anonymous())
    .list_sessions()
    .await
    .unwrap();
  assert_eq!(sessions.len(), 1);
  assert_eq!(sessions[0].id, sid);
  assert_eq!(sessions[0].user_id, uid);
  assert!(sessions[0].is_open());
  assert_eq!(sessions[0].drowsiness_count, 2);
}

#[tokio::test]
async fn list_users_decodes_roles() {
  let uid = Uuid::new_v4();
  let app = Router::new().route(
    "/api/users/",
    get(move || async move {
      Json(json!([
        { "id": uid, "name": "Avery Lee", "role": "student" },
        { "id": Uuid::new_v4(), "name": "Front Desk", "role": "staff" },
      ]))
    }),
  );
  let base = spawn_server(app).await;

  let users =
    client(&base, AdminSession::anonymous()).list_users().await.unwrap();
  assert_eq!(users.len(), 2);
  assert_eq!(users[0].id, uid);
  assert_eq!(users[0].role, carrel_core::model::Role::Student);
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_reaches_the_backend() {
  let app = Router::new().route(
    "/api/users/",
    get(|headers: HeaderMap| async move {
      match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer sekrit") => Json(json!([])).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
      }
    }),
  );
  let base = spawn_server(app).await;

  let c = client(&base, AdminSession::with_token("sekrit"));
  assert!(c.list_users().await.is_ok());
}

#[tokio::test]
async fn rejected_session_is_invalidated_in_place() {
  let app = Router::new()
    .route("/api/users/", get(|| async { StatusCode::UNAUTHORIZED }));
  let base = spawn_server(app).await;

  let session = AdminSession::with_token("expired");
  let err = client(&base, session.clone()).list_users().await.unwrap_err();

  assert!(matches!(err, ApiError::Unauthorized));
  assert!(!session.is_authenticated());
}

// ─── Error mapping ───────────────────────────────────────────────────────────

#[tokio::test]
async fn server_error_maps_to_status() {
  let app = Router::new().route(
    "/api/payments/",
    get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
  );
  let base = spawn_server(app).await;

  let err =
    client(&base, AdminSession::anonymous()).list_payments().await.unwrap_err();
  match err {
    ApiError::Status { method, path, status } => {
      assert_eq!(method, "GET");
      assert_eq!(path, "/payments/");
      assert_eq!(status.as_u16(), 500);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
  let app = Router::new().route(
    "/api/sessions/",
    get(|| async { Json(json!({ "not": "a list" })) }),
  );
  let base = spawn_server(app).await;

  let err =
    client(&base, AdminSession::anonymous()).list_sessions().await.unwrap_err();
  assert!(matches!(err, ApiError::Decode { .. }));
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn consultation_update_patches_only_set_fields() {
  let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
  let stash = received.clone();
  let app = Router::new().route(
    "/api/consultations/{id}/",
    patch(move |Path(id): Path<Uuid>, Json(body): Json<Value>| {
      let stash = stash.clone();
      async move {
        *stash.lock().unwrap() = Some(body);
        Json(json!({
          "id": id,
          "studentName": "Avery Lee",
          "phone": "010-2000-0001",
          "grade": null,
          "preferredDate": null,
          "message": null,
          "status": "contacted",
          "memo": null,
          "createdAt": Utc::now(),
        }))
      }
    }),
  );
  let base = spawn_server(app).await;

  let id = Uuid::new_v4();
  let update = ConsultationUpdate {
    status: Some(ConsultationStatus::Contacted),
    ..Default::default()
  };
  let updated = client(&base, AdminSession::anonymous())
    .update_consultation(id, &update)
    .await
    .unwrap();

  assert_eq!(updated.id, id);
  assert_eq!(updated.status, ConsultationStatus::Contacted);
  assert_eq!(
    *received.lock().unwrap(),
    Some(json!({ "status": "contacted" }))
  );
}

#[tokio::test]
async fn franchise_memo_update_sends_just_the_memo() {
  let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
  let stash = received.clone();
  let app = Router::new().route(
    "/api/franchises/{id}/",
    patch(move |Path(id): Path<Uuid>, Json(body): Json<Value>| {
      let stash = stash.clone();
      async move {
        *stash.lock().unwrap() = Some(body);
        Json(json!({
          "id": id,
          "applicantName": "Sam Okafor",
          "phone": "010-3000-0001",
          "email": null,
          "region": "Mapo-gu",
          "budget": null,
          "message": null,
          "status": "new",
          "memo": "call after 6pm",
          "createdAt": Utc::now(),
        }))
      }
    }),
  );
  let base = spawn_server(app).await;

  let update =
    InquiryUpdate { memo: Some("call after 6pm".into()), ..Default::default() };
  let updated = client(&base, AdminSession::anonymous())
    .update_franchise_inquiry(Uuid::new_v4(), &update)
    .await
    .unwrap();

  assert_eq!(updated.memo.as_deref(), Some("call after 6pm"));
  assert_eq!(
    *received.lock().unwrap(),
    Some(json!({ "memo": "call after 6pm" }))
  );
}

// ─── Payments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn payment_confirmation_posts_the_triple() {
  let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
  let stash = received.clone();
  let app = Router::new().route(
    "/api/payments/confirm/",
    post(move |Json(body): Json<Value>| {
      let stash = stash.clone();
      async move {
        *stash.lock().unwrap() = Some(body);
        Json(json!({
          "id": Uuid::new_v4(),
          "orderId": "order-2026-0042",
          "paymentKey": "pk_abc",
          "customerName": "Avery Lee",
          "plan": "monthly",
          "amount": 390000,
          "status": "DONE",
          "requestedAt": Utc::now(),
          "approvedAt": Utc::now(),
        }))
      }
    }),
  );
  let base = spawn_server(app).await;

  let confirmation = PaymentConfirmation::from_callback(
    "paymentKey=pk_abc&orderId=order-2026-0042&amount=390000",
  )
  .unwrap();
  let paid = client(&base, AdminSession::anonymous())
    .confirm_payment(&confirmation)
    .await
    .unwrap();

  assert!(paid.status.is_settled());
  assert_eq!(
    *received.lock().unwrap(),
    Some(json!({
      "paymentKey": "pk_abc",
      "orderId": "order-2026-0042",
      "amount": 390000,
    }))
  );
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_is_derived_from_live_records() {
  let uid = Uuid::new_v4();
  let start = Utc::now();
  let users = json!([{ "id": uid, "name": "Avery Lee", "role": "student" }]);
  let sessions = json!([{
    "id": Uuid::new_v4(),
    "userId": uid,
    "subject": "math",
    "startTime": start,
    "endTime": null,
    "pureMinutes": 0,
    "drowsinessCount": 1,
  }]);
  let app = Router::new()
    .route(
      "/api/users/",
      get(move || {
        let users = users.clone();
        async move { Json(users) }
      }),
    )
    .route(
      "/api/sessions/",
      get(move || {
        let sessions = sessions.clone();
        async move { Json(sessions) }
      }),
    );
  let base = spawn_server(app).await;

  let snap = client(&base, AdminSession::anonymous())
    .fetch_dashboard()
    .await
    .unwrap();

  assert_eq!(snap.stats.total_students, 1);
  assert_eq!(snap.stats.drowsiness_detected, 1);
  assert_eq!(snap.students[0].status, StudentStatus::Drowsy);
  assert_eq!(snap.students[0].current_subject.as_deref(), Some("math"));
}

// ─── Poller ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn poller_reports_monotonic_sequence() {
  let app = Router::new()
    .route("/api/users/", get(|| async { Json(json!([])) }))
    .route("/api/sessions/", get(|| async { Json(json!([])) }));
  let base = spawn_server(app).await;

  let shutdown = CancellationToken::new();
  let mut rx = spawn_dashboard_poller(
    client(&base, AdminSession::anonymous()),
    fast_poll(),
    shutdown.clone(),
  );

  let first = rx.recv().await.expect("first outcome");
  let second = rx.recv().await.expect("second outcome");
  assert!(first.result.is_ok());
  assert!(second.result.is_ok());
  assert!(second.seq > first.seq);
  shutdown.cancel();
}

#[tokio::test]
async fn cancelled_poller_closes_its_channel() {
  let app = Router::new()
    .route("/api/users/", get(|| async { Json(json!([])) }))
    .route("/api/sessions/", get(|| async { Json(json!([])) }));
  let base = spawn_server(app).await;

  let shutdown = CancellationToken::new();
  let mut rx = spawn_dashboard_poller(
    client(&base, AdminSession::anonymous()),
    fast_poll(),
    shutdown.clone(),
  );

  rx.recv().await.expect("first outcome");
  shutdown.cancel();

  // Buffered outcomes may still drain; the sender must drop soon after.
  loop {
    match tokio::time::timeout(Duration::from_secs(2), rx.recv()).await {
      Ok(Some(_)) => continue,
      Ok(None) => break,
      Err(_) => panic!("poller did not stop"),
    }
  }
}

#[tokio::test]
async fn unauthorized_poll_reports_once_and_stops() {
  let app = Router::new()
    .route("/api/users/", get(|| async { StatusCode::UNAUTHORIZED }))
    .route("/api/sessions/", get(|| async { StatusCode::UNAUTHORIZED }));
  let base = spawn_server(app).await;

  let session = AdminSession::with_token("stale");
  let mut rx = spawn_dashboard_poller(
    client(&base, session.clone()),
    fast_poll(),
    CancellationToken::new(),
  );

  let first = rx.recv().await.expect("outcome");
  assert!(matches!(first.result, Err(ApiError::Unauthorized)));
  assert!(!session.is_authenticated());
  assert!(rx.recv().await.is_none());
}

// ─── Alert feed ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn alert_feed_delivers_events_in_order() {
  let id_a = Uuid::new_v4();
  let id_b = Uuid::new_v4();
  let body = format!(
    "event: drowsinessAlert\ndata: {}\n\nevent: drowsinessAlert\ndata: {}\n\n",
    json!({ "studentName": "Avery Lee", "recordId": id_a }),
    json!({ "studentName": "Jules Moreno", "recordId": id_b }),
  );
  let app = Router::new().route(
    "/api/alerts/stream/",
    get(move || {
      let body = body.clone();
      async move { ([(header::CONTENT_TYPE, "text/event-stream")], body) }
    }),
  );
  let base = spawn_server(app).await;

  let shutdown = CancellationToken::new();
  let mut rx = spawn_alert_feed(
    client(&base, AdminSession::anonymous()),
    shutdown.clone(),
  );

  let first = rx.recv().await.expect("first alert");
  assert_eq!(first.student_name, "Avery Lee");
  assert_eq!(first.record_id, id_a);
  let second = rx.recv().await.expect("second alert");
  assert_eq!(second.student_name, "Jules Moreno");
  assert_eq!(second.record_id, id_b);
  shutdown.cancel();
}

#[tokio::test]
async fn alert_feed_skips_comments_and_other_events() {
  let id = Uuid::new_v4();
  let body = format!(
    ": keepalive\n\nevent: seatChange\ndata: {{}}\n\nevent: drowsinessAlert\ndata: {}\n\n",
    json!({ "studentName": "Kiara Patel", "recordId": id }),
  );
  let app = Router::new().route(
    "/api/alerts/stream/",
    get(move || {
      let body = body.clone();
      async move { ([(header::CONTENT_TYPE, "text/event-stream")], body) }
    }),
  );
  let base = spawn_server(app).await;

  let shutdown = CancellationToken::new();
  let mut rx = spawn_alert_feed(
    client(&base, AdminSession::anonymous()),
    shutdown.clone(),
  );

  let alert = rx.recv().await.expect("alert");
  assert_eq!(alert.student_name, "Kiara Patel");
  assert_eq!(alert.record_id, id);
  shutdown.cancel();
}
