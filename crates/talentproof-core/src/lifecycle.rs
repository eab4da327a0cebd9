//! Lifecycle controller: submission, lookup, status transition, deletion.
//!
//! Every admin operation runs [`require_admin`] first and validates its input
//! before any store call, so a rejected call never mutates anything. No
//! operation spans more than one store write.

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{Actor, require_admin},
  notify::Dispatcher,
  request::{ContactRequest, ContactRequestDetail, ContactRequestDraft, ContactStatus},
  store::ContactRequestStore,
  talent::{NewTalent, Talent},
};

/// Recruiter-facing submission. No actor is required.
///
/// The talent must exist. Notifications go out after the insert; their
/// failure is logged by the [`Dispatcher`] and does not affect the result.
pub async fn submit_contact_request<S>(
  store: &S,
  dispatcher: &Dispatcher,
  draft: ContactRequestDraft,
) -> Result<ContactRequest>
where
  S: ContactRequestStore,
{
  let input = draft.validate()?;

  let talent = store
    .get_talent(input.talent_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::TalentNotFound(input.talent_id))?;

  let request = store
    .insert_contact_request(input)
    .await
    .map_err(Error::store)?;

  tracing::info!(
    id = %request.id,
    talent = %talent.id,
    company = %request.company_name,
    "contact request submitted"
  );

  dispatcher.contact_request_submitted(&request, &talent).await;

  Ok(request)
}

/// Fetch one request with its brief talent projection.
pub async fn get_contact_request<S>(
  store: &S,
  actor: &Actor,
  id: Uuid,
) -> Result<ContactRequestDetail>
where
  S: ContactRequestStore,
{
  require_admin(actor)?;

  store
    .get_contact_request(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ContactRequestNotFound(id))
}

/// Set the status of a request.
///
/// Any enumerated target is accepted from any current state, including
/// `processed → new` and self-transitions. Concurrent calls are last writer
/// wins.
pub async fn set_status<S>(
  store: &S,
  actor: &Actor,
  id: Uuid,
  raw_status: &str,
) -> Result<ContactRequestDetail>
where
  S: ContactRequestStore,
{
  require_admin(actor)?;

  let status: ContactStatus = raw_status
    .parse()
    .map_err(|_| Error::InvalidStatus(raw_status.to_owned()))?;

  let updated = store
    .set_status(id, status)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ContactRequestNotFound(id))?;

  tracing::info!(%id, %status, "contact request status updated");
  Ok(updated)
}

/// Permanently remove a request. The referenced talent is untouched.
///
/// The existence check and the delete are separate store calls; if another
/// actor deletes in between, the delete itself reports not found.
pub async fn delete_contact_request<S>(
  store: &S,
  actor: &Actor,
  id: Uuid,
) -> Result<()>
where
  S: ContactRequestStore,
{
  require_admin(actor)?;

  store
    .get_contact_request(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::ContactRequestNotFound(id))?;

  let deleted = store
    .delete_contact_request(id)
    .await
    .map_err(Error::store)?;
  if !deleted {
    return Err(Error::ContactRequestNotFound(id));
  }

  tracing::info!(%id, "contact request deleted");
  Ok(())
}

/// Add a talent to the registry contact requests can point at.
pub async fn register_talent<S>(
  store: &S,
  actor: &Actor,
  input: NewTalent,
) -> Result<Talent>
where
  S: ContactRequestStore,
{
  require_admin(actor)?;

  let input = input.normalized()?;
  let talent = store.add_talent(input).await.map_err(Error::store)?;

  tracing::info!(id = %talent.id, name = %talent.display_name, "talent registered");
  Ok(talent)
}
