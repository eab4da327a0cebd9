//! Bearer-token identity: admin login, token issuing, and the [`Caller`]
//! extractor that resolves an [`Actor`] for every request.

use std::convert::Infallible;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use talentproof_core::{
  access::{Actor, Role},
  store::ContactRequestStore,
};

use crate::{AppState, error::Error};

/// HS256 keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl TokenKeys {
  pub fn from_secret(secret: &[u8]) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
    }
  }
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:  String,
  pub role: String,
  pub iat:  i64,
  pub exp:  i64,
}

/// A freshly signed token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
  pub token:      String,
  pub expires_at: DateTime<Utc>,
}

/// Credentials and keys accepted by this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// Compared case-insensitively.
  pub admin_email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
  pub keys:                TokenKeys,
  pub token_ttl:           TimeDelta,
}

impl AuthConfig {
  /// Check login credentials against the configured administrator.
  ///
  /// Every failure is the same error, so callers learn nothing about which
  /// part was wrong.
  pub fn verify_admin(&self, email: &str, password: &str) -> Result<(), Error> {
    if !email.trim().eq_ignore_ascii_case(&self.admin_email) {
      return Err(Error::InvalidCredentials);
    }

    let parsed_hash = PasswordHash::new(&self.admin_password_hash).map_err(|e| {
      tracing::error!(error = %e, "configured admin password hash is unreadable");
      Error::InvalidCredentials
    })?;

    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::InvalidCredentials)
  }

  /// Sign a token for `subject` with `role`, valid from `now` for the
  /// configured TTL.
  pub fn issue(
    &self,
    subject: &str,
    role: &Role,
    now: DateTime<Utc>,
  ) -> Result<IssuedToken, Error> {
    let expires_at = now + self.token_ttl;
    let claims = Claims {
      sub:  subject.to_owned(),
      role: role.as_str().to_owned(),
      iat:  now.timestamp(),
      exp:  expires_at.timestamp(),
    };
    let token =
      jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)?;
    Ok(IssuedToken { token, expires_at })
  }

  /// Resolve the actor behind a request. Anything short of a valid token is
  /// the anonymous actor; the desk guard turns that into a 401.
  pub fn resolve(&self, headers: &HeaderMap) -> Actor {
    let Some(token) = bearer_token(headers) else {
      return Actor::anonymous();
    };

    let validation = Validation::new(Algorithm::HS256);
    match jsonwebtoken::decode::<Claims>(token, &self.keys.decoding, &validation) {
      Ok(data) => Actor::authenticated(data.claims.sub, data.claims.role),
      Err(e) => {
        tracing::debug!(error = %e, "bearer token rejected");
        Actor::anonymous()
      }
    }
  }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The resolved actor for the current request. Never rejects.
pub struct Caller(pub Actor);

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: ContactRequestStore + Clone + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(Caller(state.auth.resolve(&parts.headers)))
  }
}
