//! `POST /talents`: register a talent profile.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use serde::Serialize;
use talentproof_core::{
  access::require_admin,
  lifecycle,
  store::ContactRequestStore,
  talent::{NewTalent, Talent},
};

use crate::{
  AppState,
  auth::Caller,
  error::{Error, Result},
};

#[derive(Serialize)]
pub struct TalentResponse {
  pub success: bool,
  pub talent:  Talent,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  Caller(actor): Caller,
  body: Result<Json<NewTalent>, JsonRejection>,
) -> Result<(StatusCode, Json<TalentResponse>)>
where
  S: ContactRequestStore + Clone + 'static,
{
  // Identity is checked before the body is looked at.
  require_admin(&actor)?;
  let Json(input) = body.map_err(|e| Error::BadRequest(e.body_text()))?;

  let talent = lifecycle::register_talent(state.store.as_ref(), &actor, input).await?;

  Ok((StatusCode::CREATED, Json(TalentResponse { success: true, talent })))
}
