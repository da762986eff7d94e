//! Handler for `GET /owner`.

use axum::{Json, extract::State};
use rapsheet_core::{Identity, Record, store::RecordStore};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct OwnerBody {
  pub owner: Identity,
}

/// `GET /owner` — the identity captured when the registry was built.
pub async fn handler<R, S>(State(state): State<AppState<R, S>>) -> Json<OwnerBody>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  Json(OwnerBody { owner: state.registry.owner().clone() })
}
