//! JSON REST API for rapsheet.
//!
//! Exposes an axum [`Router`] backed by a [`Registry`] over any
//! [`RecordStore`]. Callers authenticate with HTTP Basic; TLS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store, owner, auth);
//! axum::serve(listener, rapsheet_api::api_router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod events;
pub mod owner;
pub mod records;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rapsheet_core::{
  Identity, Record, Registry,
  notify::{Fanout, Notification},
  store::RecordStore,
};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

pub use auth::{Account, AuthConfig};
pub use error::ApiError;
pub use events::TracingNotifier;

/// Notifications buffered per `/events` subscriber before it starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<R, S> {
  pub registry: Arc<Registry<R, S>>,
  pub auth:     Arc<AuthConfig>,
  /// Live notification feed; every `/events` request subscribes to it.
  pub events:   broadcast::Sender<Notification>,
}

impl<R, S> Clone for AppState<R, S> {
  fn clone(&self) -> Self {
    Self {
      registry: Arc::clone(&self.registry),
      auth:     Arc::clone(&self.auth),
      events:   self.events.clone(),
    }
  }
}

impl<R, S> AppState<R, S>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  /// Build a registry over `store` owned by `owner`, wired to publish its
  /// notifications on the `/events` feed and to the log.
  pub fn new(store: S, owner: Identity, auth: AuthConfig) -> Self {
    let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let registry = Registry::new(store, owner)
      .with_notifier(Fanout(events.clone(), TracingNotifier));
    Self {
      registry: Arc::new(registry),
      auth: Arc::new(auth),
      events,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R, S>(state: AppState<R, S>) -> Router<()>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  Router::new()
    .route("/owner", get(owner::handler::<R, S>))
    // Records
    .route("/records", post(records::create::<R, S>))
    .route(
      "/records/{cnic}",
      get(records::get_one::<R, S>)
        .put(records::update::<R, S>)
        .delete(records::delete::<R, S>),
    )
    // Notifications
    .route("/events", get(events::stream::<R, S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, Response, StatusCode, header},
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use chrono::NaiveDate;
  use rand_core::OsRng;
  use rapsheet_core::{
    Cnic, CriminalRecord, FlatRecord, Severity,
    memory::MemoryStore,
    notify::Event,
    record::{CrimeDetails, PersonalDetails, PrisonDetails},
  };
  use tower::ServiceExt as _;

  use super::*;

  const CNIC: u64 = 1_234_567_890_123;

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn make_state<R: Record>() -> AppState<R, MemoryStore<R>> {
    let auth = AuthConfig {
      accounts: vec![
        Account { username: "owner".into(), password_hash: hash("secret") },
        Account { username: "guest".into(), password_hash: hash("guest-pass") },
      ],
    };
    AppState::new(MemoryStore::new(), Identity::new("owner").unwrap(), auth)
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn owner_auth() -> String { basic("owner", "secret") }

  fn guest_auth() -> String { basic("guest", "guest-pass") }

  fn criminal(name: &str) -> CriminalRecord {
    CriminalRecord {
      personal: PersonalDetails {
        name:        name.into(),
        father_name: "Ali".into(),
        age:         25,
        cnic:        Cnic::new(CNIC).unwrap(),
        location:    "City A".into(),
        gender:      "Male".into(),
      },
      crime:    CrimeDetails {
        id:                    1,
        severity:              Severity::High,
        offense_description:   "Robbery".into(),
        offense_code:          101,
        offense_date:          NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        case_id:               1001,
        investigating_officer: "Officer A".into(),
        court_verdict:         "Guilty".into(),
      },
      prison:   PrisonDetails {
        location:     "Prison A".into(),
        prison_id:    101,
        tenure_years: 5,
        prison_code:  202,
      },
    }
  }

  async fn oneshot<R: Record>(
    state: AppState<R, MemoryStore<R>>,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<String>,
  ) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn record_uri() -> String { format!("/records/{CNIC}") }

  async fn seed(state: &AppState<CriminalRecord, MemoryStore<CriminalRecord>>) {
    let body = serde_json::to_string(&criminal("Huzaifa")).unwrap();
    let resp = oneshot(
      state.clone(),
      "POST",
      "/records",
      Some(&owner_auth()),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  // ── Owner ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_endpoint_reports_configured_owner() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(state, "GET", "/owner", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["owner"], "owner");
  }

  // ── Create ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_creates_and_anyone_reads() {
    let state = make_state();
    seed(&state).await;

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let got: CriminalRecord = serde_json::from_value(json_body(resp).await).unwrap();
    assert_eq!(got, criminal("Huzaifa"));
  }

  #[tokio::test]
  async fn dashed_cnic_in_path_is_accepted() {
    let state = make_state();
    seed(&state).await;
    let resp = oneshot(state, "GET", "/records/12345-6789012-3", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn create_without_credentials_is_401() {
    let state = make_state::<CriminalRecord>();
    let body = serde_json::to_string(&criminal("Huzaifa")).unwrap();
    let resp = oneshot(state, "POST", "/records", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn create_by_non_owner_is_403_and_stores_nothing() {
    let state = make_state::<CriminalRecord>();
    let body = serde_json::to_string(&criminal("Huzaifa")).unwrap();
    let resp = oneshot(
      state.clone(),
      "POST",
      "/records",
      Some(&guest_auth()),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let err = json_body(resp).await;
    assert!(err["error"].as_str().unwrap().contains("Access denied"));

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn wrong_password_is_401_even_for_reads() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(
      state,
      "GET",
      &record_uri(),
      Some(&basic("owner", "wrong")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Get ──────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_record_is_404_with_message() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(state, "GET", "/records/9999999999999", None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "Criminal data not found");
  }

  #[tokio::test]
  async fn malformed_cnic_is_400() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(state, "GET", "/records/not-a-cnic", None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn bad_cnic_in_body_is_400_with_error() {
    let state = make_state::<CriminalRecord>();
    let mut body = serde_json::to_value(criminal("Huzaifa")).unwrap();
    body["personal"]["cnic"] = serde_json::json!(42);

    let resp = oneshot(
      state.clone(),
      "POST",
      "/records",
      Some(&owner_auth()),
      Some(body.to_string()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert!(json["error"].as_str().unwrap().contains("invalid CNIC"));

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unknown_severity_in_update_is_400() {
    let state = make_state();
    seed(&state).await;
    let mut body = serde_json::to_value(criminal("Huzaifa")).unwrap();
    body["crime"]["severity"] = serde_json::json!(7);

    let resp = oneshot(
      state,
      "PUT",
      &record_uri(),
      Some(&owner_auth()),
      Some(body.to_string()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert!(json["error"].as_str().unwrap().contains("unknown severity code: 7"));
  }

  #[tokio::test]
  async fn numeric_severity_code_is_accepted() {
    let state = make_state::<CriminalRecord>();
    let mut body = serde_json::to_value(criminal("Huzaifa")).unwrap();
    body["crime"]["severity"] = serde_json::json!(1);

    let resp = oneshot(
      state.clone(),
      "POST",
      "/records",
      Some(&owner_auth()),
      Some(body.to_string()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    let got: CriminalRecord = serde_json::from_value(json_body(resp).await).unwrap();
    assert_eq!(got.crime.severity, Severity::Medium);
  }

  // ── Update ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_updates_wholesale() {
    let state = make_state();
    seed(&state).await;

    let updated = criminal("Updated Huzaifa");
    let resp = oneshot(
      state.clone(),
      "PUT",
      &record_uri(),
      Some(&owner_auth()),
      Some(serde_json::to_string(&updated).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    let got: CriminalRecord = serde_json::from_value(json_body(resp).await).unwrap();
    assert_eq!(got, updated);
  }

  #[tokio::test]
  async fn update_of_missing_record_is_404() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(
      state,
      "PUT",
      &record_uri(),
      Some(&owner_auth()),
      Some(serde_json::to_string(&criminal("Nobody")).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_under_a_different_cnic_is_400() {
    let state = make_state();
    seed(&state).await;
    let resp = oneshot(
      state,
      "PUT",
      "/records/9876543210987",
      Some(&owner_auth()),
      Some(serde_json::to_string(&criminal("Huzaifa")).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_by_non_owner_is_403() {
    let state = make_state();
    seed(&state).await;
    let resp = oneshot(
      state.clone(),
      "PUT",
      &record_uri(),
      Some(&guest_auth()),
      Some(serde_json::to_string(&criminal("Unauthorized Update")).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = oneshot(state, "GET", &record_uri(), None, None).await;
    let got: CriminalRecord = serde_json::from_value(json_body(resp).await).unwrap();
    assert_eq!(got.personal.name, "Huzaifa");
  }

  // ── Delete ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_flow_with_flat_schema() {
    let state = make_state::<FlatRecord>();
    let record = FlatRecord {
      name:        "John Doe".into(),
      id:          1,
      cnic:        Cnic::new(CNIC).unwrap(),
      sensitivity: Severity::High,
    };
    let resp = oneshot(
      state.clone(),
      "POST",
      "/records",
      Some(&owner_auth()),
      Some(serde_json::to_string(&record).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = oneshot(state.clone(), "DELETE", &record_uri(), Some(&guest_auth()), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["error"], "Access denied");

    let resp = oneshot(state.clone(), "DELETE", &record_uri(), Some(&owner_auth()), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = oneshot(state.clone(), "GET", &record_uri(), None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Deleting again still succeeds.
    let resp = oneshot(state, "DELETE", &record_uri(), Some(&owner_auth()), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }

  // ── Notifications ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mutations_publish_on_the_event_feed() {
    let state = make_state();
    let mut rx = state.events.subscribe();

    seed(&state).await;
    let resp = oneshot(
      state.clone(),
      "PUT",
      &record_uri(),
      Some(&guest_auth()),
      Some(serde_json::to_string(&criminal("Nope")).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = oneshot(
      state.clone(),
      "PUT",
      &record_uri(),
      Some(&owner_auth()),
      Some(serde_json::to_string(&criminal("Huzaifa")).unwrap()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let first = rx.recv().await.unwrap();
    assert!(matches!(
      first.event,
      Event::EntityCreated { entity_id: 1, ref owner, .. } if owner.as_str() == "owner"
    ));
    let second = rx.recv().await.unwrap();
    assert!(matches!(second.event, Event::EntityUpdated { entity_id: 1, .. }));
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test]
  async fn events_endpoint_opens_an_sse_stream() {
    let state = make_state::<CriminalRecord>();
    let resp = oneshot(state, "GET", "/events", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/event-stream"), "Content-Type: {ct}");
  }
}
