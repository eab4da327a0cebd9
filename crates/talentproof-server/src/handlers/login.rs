//! `POST /auth/login`: exchange administrator credentials for a token.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use talentproof_core::{access::Role, store::ContactRequestStore};

use crate::{
  AppState,
  error::{Error, Result},
};

#[derive(Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
  pub success:    bool,
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>>
where
  S: ContactRequestStore + Clone + 'static,
{
  let Json(body) = body.map_err(|e| Error::BadRequest(e.body_text()))?;

  if let Err(e) = state.auth.verify_admin(&body.email, &body.password) {
    tracing::warn!(email = %body.email, "admin login rejected");
    return Err(e);
  }

  let issued = state.auth.issue(&state.auth.admin_email, &Role::Admin, Utc::now())?;
  tracing::info!(email = %state.auth.admin_email, "admin logged in");

  Ok(Json(LoginResponse {
    success:    true,
    token:      issued.token,
    expires_at: issued.expires_at,
  }))
}
