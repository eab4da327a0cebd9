//! Error types for `talentproof-core`.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("authentication required")]
  Unauthorized,

  #[error("administrator role required")]
  Forbidden,

  #[error("invalid status: {0:?}")]
  InvalidStatus(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("contact request not found: {0}")]
  ContactRequestNotFound(Uuid),

  #[error("talent not found: {0}")]
  TalentNotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Validation ──────────────────────────────────────────────────────────────

/// Field-level validation failures, keyed by the wire (camelCase) field name.
///
/// Messages are user-facing and written in the platform's language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.entry(field).or_insert_with(|| message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.keys().copied()
  }

  /// `Ok(value)` when no failure was recorded.
  pub fn finish<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let fields: Vec<&str> = self.fields().collect();
    write!(f, "invalid fields: {}", fields.join(", "))
  }
}
