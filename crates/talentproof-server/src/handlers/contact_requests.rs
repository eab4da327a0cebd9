//! Handlers for `/contact-requests`: the admin desk plus public submission.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use talentproof_core::{
  access::require_admin,
  lifecycle,
  query::{self, PageSpec, Pagination},
  request::{ContactRequest, ContactRequestDetail, ContactRequestDraft, ContactRequestView},
  store::{ContactRequestFilter, ContactRequestStore, StatusCounts, StatusFilter},
};
use uuid::Uuid;

use crate::{
  AppState,
  auth::Caller,
  error::{Error, Result},
  handlers::{MessageBody, parse_id},
};

/// Raw listing parameters. Everything is a string so that malformed paging
/// values can fall back to the defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:   Option<String>,
  pub limit:  Option<String>,
  #[serde(alias = "status")]
  pub statut: Option<String>,
  pub search: Option<String>,
  pub talent: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
  pub success:          bool,
  pub contact_requests: Vec<ContactRequestView>,
  pub stats:            StatusCounts,
  pub pagination:       Pagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
  pub success:         bool,
  pub contact_request: ContactRequestDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
  pub success:         bool,
  pub message:         &'static str,
  pub contact_request: ContactRequestDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
  pub success:         bool,
  pub message:         &'static str,
  pub contact_request: ContactRequest,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusBody {
  #[serde(default, alias = "status")]
  pub statut: String,
}

/// `GET /contact-requests`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Caller(actor): Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>>
where
  S: ContactRequestStore + Clone + 'static,
{
  require_admin(&actor)?;

  let talent_id = params
    .talent
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| {
      s.parse::<Uuid>()
        .map_err(|_| Error::BadRequest(format!("invalid talent id: {s}")))
    })
    .transpose()?;

  let filter = ContactRequestFilter {
    status: StatusFilter::from_param(params.statut.as_deref()),
    search: params.search,
    talent_id,
  };
  let page = PageSpec::from_params(params.page.as_deref(), params.limit.as_deref());

  let listing =
    query::list_contact_requests(state.store.as_ref(), &actor, filter, page).await?;

  Ok(Json(ListResponse {
    success:          true,
    contact_requests: listing.items,
    stats:            listing.stats,
    pagination:       listing.pagination,
  }))
}

/// `GET /contact-requests/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Caller(actor): Caller,
  Path(id): Path<String>,
) -> Result<Json<DetailResponse>>
where
  S: ContactRequestStore + Clone + 'static,
{
  require_admin(&actor)?;
  let id = parse_id(&id)?;

  let contact_request =
    lifecycle::get_contact_request(state.store.as_ref(), &actor, id).await?;

  Ok(Json(DetailResponse { success: true, contact_request }))
}

/// `PUT /contact-requests/{id}/status`
///
/// An unreadable body is treated as an empty status, which the lifecycle
/// rejects as invalid after the role check.
pub async fn update_status<S>(
  State(state): State<AppState<S>>,
  Caller(actor): Caller,
  Path(id): Path<String>,
  body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<UpdatedResponse>>
where
  S: ContactRequestStore + Clone + 'static,
{
  require_admin(&actor)?;
  let id = parse_id(&id)?;

  let statut = match body {
    Ok(Json(body)) => body.statut,
    Err(e) => {
      tracing::debug!(error = %e.body_text(), "unreadable status body");
      String::new()
    }
  };

  let contact_request =
    lifecycle::set_status(state.store.as_ref(), &actor, id, &statut).await?;

  Ok(Json(UpdatedResponse {
    success: true,
    message: "Statut mis à jour avec succès",
    contact_request,
  }))
}

/// `DELETE /contact-requests/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Caller(actor): Caller,
  Path(id): Path<String>,
) -> Result<Json<MessageBody>>
where
  S: ContactRequestStore + Clone + 'static,
{
  require_admin(&actor)?;
  let id = parse_id(&id)?;

  lifecycle::delete_contact_request(state.store.as_ref(), &actor, id).await?;

  Ok(Json(MessageBody {
    success: true,
    message: "Demande de contact supprimée avec succès",
  }))
}

/// `POST /contact-requests`. Public, no token required.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<ContactRequestDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmittedResponse>)>
where
  S: ContactRequestStore + Clone + 'static,
{
  let Json(draft) = body.map_err(|e| Error::BadRequest(e.body_text()))?;

  let contact_request =
    lifecycle::submit_contact_request(state.store.as_ref(), &state.dispatcher, draft)
      .await?;

  Ok((
    StatusCode::CREATED,
    Json(SubmittedResponse {
      success: true,
      message: "Demande de contact envoyée avec succès",
      contact_request,
    }),
  ))
}
