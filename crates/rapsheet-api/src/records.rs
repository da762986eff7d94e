//! Handlers for `/records` endpoints.
//!
//! | Method   | Path              | Notes |
//! |----------|-------------------|-------|
//! | `POST`   | `/records`        | Owner only. Body: a full record; returns 201 + the record |
//! | `GET`    | `/records/{cnic}` | Open. 404 if absent |
//! | `PUT`    | `/records/{cnic}` | Owner only. Body: the full replacement record |
//! | `DELETE` | `/records/{cnic}` | Owner only. 204, also when already absent |
//!
//! `{cnic}` accepts plain digits or the dashed `#####-#######-#` form.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use rapsheet_core::{Cnic, Record, store::RecordStore};

use crate::{
  AppState,
  auth::{Caller, Reader},
  error::ApiError,
};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /records` — the record is stored at its embedded CNIC.
pub async fn create<R, S>(
  State(state): State<AppState<R, S>>,
  Caller(caller): Caller,
  body: Result<Json<R>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  let Json(record) = body?;
  let cnic = record.cnic();
  state.registry.create_entity(record.clone(), &caller).await?;
  tracing::info!(cnic = %cnic.dashed(), %caller, "record created");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /records/{cnic}`
pub async fn get_one<R, S>(
  State(state): State<AppState<R, S>>,
  Path(raw): Path<String>,
  Reader(reader): Reader,
) -> Result<Json<R>, ApiError>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  let cnic: Cnic = raw.parse()?;
  let record = state.registry.get_entity(cnic, &reader).await?;
  tracing::debug!(cnic = %cnic.dashed(), %reader, "record read");
  Ok(Json(record))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /records/{cnic}` — wholesale replacement; there is no partial update.
pub async fn update<R, S>(
  State(state): State<AppState<R, S>>,
  Path(raw): Path<String>,
  Caller(caller): Caller,
  body: Result<Json<R>, JsonRejection>,
) -> Result<Json<R>, ApiError>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  let cnic: Cnic = raw.parse()?;
  let Json(record) = body?;
  state
    .registry
    .update_entity(cnic, record.clone(), &caller)
    .await?;
  tracing::info!(cnic = %cnic.dashed(), %caller, "record updated");
  Ok(Json(record))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /records/{cnic}`
pub async fn delete<R, S>(
  State(state): State<AppState<R, S>>,
  Path(raw): Path<String>,
  Caller(caller): Caller,
) -> Result<StatusCode, ApiError>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  let cnic: Cnic = raw.parse()?;
  state.registry.delete_entity(cnic, &caller).await?;
  tracing::info!(cnic = %cnic.dashed(), %caller, "record deleted");
  Ok(StatusCode::NO_CONTENT)
}
