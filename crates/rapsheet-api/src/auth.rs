//! HTTP Basic-auth extractors that establish the caller identity.
//!
//! Each configured account maps a username to an argon2 PHC hash. The
//! authenticated username becomes the caller [`Identity`] handed to the
//! registry; whether that identity may mutate is the registry's decision.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rapsheet_core::{Identity, Record, store::RecordStore};

use crate::{AppState, error::ApiError};

/// One account allowed to authenticate.
#[derive(Debug, Clone)]
pub struct Account {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Accounts accepted by this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<Account>,
}

/// Verify credentials directly from headers.
///
/// Returns `Ok(None)` if no `Authorization` header is present at all, and
/// [`ApiError::Unauthorized`] if one is present but does not check out.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Option<Identity>, ApiError> {
  let Some(header_val) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let header_val = header_val.to_str().map_err(|_| ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let account = config
    .accounts
    .iter()
    .find(|a| a.username == username)
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  let identity = Identity::new(username).map_err(|_| ApiError::Unauthorized)?;
  Ok(Some(identity))
}

/// An authenticated caller. Rejects with 401 if credentials are missing.
pub struct Caller(pub Identity);

/// The caller on open routes: authenticated if credentials were sent,
/// [`Identity::anonymous`] otherwise.
pub struct Reader(pub Identity);

impl<R, S> FromRequestParts<AppState<R, S>> for Caller
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<R, S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?
      .map(Caller)
      .ok_or(ApiError::Unauthorized)
  }
}

impl<R, S> FromRequestParts<AppState<R, S>> for Reader
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<R, S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = verify_auth(&parts.headers, &state.auth)?
      .unwrap_or_else(Identity::anonymous);
    Ok(Reader(identity))
  }
}
