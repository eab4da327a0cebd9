pub mod contact_requests;
pub mod health;
pub mod login;
pub mod talents;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Error;

/// Body of responses that carry only `success` and `message`.
#[derive(Serialize)]
pub struct MessageBody {
  pub success: bool,
  pub message: &'static str,
}

/// Fallback for unrouted paths.
pub async fn not_found() -> (StatusCode, Json<MessageBody>) {
  (
    StatusCode::NOT_FOUND,
    Json(MessageBody { success: false, message: "Ressource introuvable" }),
  )
}

/// Parse a contact request id from the path. A value that is not a UUID
/// cannot name any request, so it is reported as not found.
pub fn parse_id(raw: &str) -> Result<Uuid, Error> {
  raw.parse().map_err(|_| Error::MalformedId(raw.to_owned()))
}
