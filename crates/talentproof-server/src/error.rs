//! Error types and axum `IntoResponse` implementation.
//!
//! Every failure is rendered as `{"success": false, "message": ...}` with a
//! French, user-facing message. Validation failures add `errors`; store
//! failures add a machine code in `error` and keep the detail in the logs.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use talentproof_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A path id that cannot name any contact request.
  #[error("malformed contact request id: {0}")]
  MalformedId(String),

  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),
}

impl Error {
  fn status_and_message(&self) -> (StatusCode, &'static str) {
    match self {
      Error::Core(e) => match e {
        CoreError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentification requise"),
        CoreError::Forbidden => {
          (StatusCode::FORBIDDEN, "Accès réservé aux administrateurs")
        }
        CoreError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "Statut invalide"),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "Données invalides"),
        CoreError::ContactRequestNotFound(_) => {
          (StatusCode::NOT_FOUND, "Demande de contact non trouvée")
        }
        CoreError::TalentNotFound(_) => (StatusCode::NOT_FOUND, "Talent non trouvé"),
        CoreError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Erreur serveur"),
      },
      Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Identifiants invalides"),
      Error::BadRequest(_) => (StatusCode::BAD_REQUEST, "Requête invalide"),
      Error::MalformedId(_) => (StatusCode::NOT_FOUND, "Demande de contact non trouvée"),
      Error::Token(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Erreur serveur"),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = self.status_and_message();

    let body = match &self {
      Error::Core(CoreError::Validation(errors)) => {
        json!({ "success": false, "message": message, "errors": errors })
      }
      Error::Core(CoreError::Store(source)) => {
        tracing::error!(error = %source, "store failure");
        json!({ "success": false, "message": message, "error": "store_failure" })
      }
      Error::Token(source) => {
        tracing::error!(error = %source, "token signing failure");
        json!({ "success": false, "message": message, "error": "token_failure" })
      }
      Error::BadRequest(detail) => {
        tracing::debug!(%detail, "rejected malformed request");
        json!({ "success": false, "message": message })
      }
      _ => json!({ "success": false, "message": message }),
    };

    let mut res = (status, Json(body)).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"talentproof\""),
      );
    }
    res
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
