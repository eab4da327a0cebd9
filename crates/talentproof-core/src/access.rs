//! Actor context and the admin guard.
//!
//! The HTTP layer resolves an [`Actor`] from the bearer credential and passes
//! it explicitly into every desk operation, which calls [`require_admin`]
//! before touching the store.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Role string carried by administrator credentials.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  Admin,
  /// Any other role; kept verbatim for logging.
  Other(String),
}

impl Role {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Admin => ADMIN_ROLE,
      Self::Other(s) => s,
    }
  }
}

impl From<String> for Role {
  fn from(s: String) -> Self {
    if s == ADMIN_ROLE { Self::Admin } else { Self::Other(s) }
  }
}

impl From<&str> for Role {
  fn from(s: &str) -> Self { Self::from(s.to_owned()) }
}

impl From<Role> for String {
  fn from(role: Role) -> Self {
    match role {
      Role::Admin => ADMIN_ROLE.to_owned(),
      Role::Other(s) => s,
    }
  }
}

/// Who is calling, as resolved from the request credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
  pub is_authenticated: bool,
  pub role:             Role,
  /// Credential subject, for logs only.
  pub subject:          Option<String>,
}

impl Actor {
  /// No credential, or one that failed verification.
  pub fn anonymous() -> Self {
    Self {
      is_authenticated: false,
      role:             Role::Other(String::new()),
      subject:          None,
    }
  }

  pub fn authenticated(subject: impl Into<String>, role: impl Into<Role>) -> Self {
    Self {
      is_authenticated: true,
      role:             role.into(),
      subject:          Some(subject.into()),
    }
  }

  pub fn is_admin(&self) -> bool {
    self.is_authenticated && self.role == Role::Admin
  }
}

/// Authentication is checked before the role.
pub fn require_admin(actor: &Actor) -> Result<()> {
  if !actor.is_authenticated {
    return Err(Error::Unauthorized);
  }
  if actor.role != Role::Admin {
    tracing::debug!(
      subject = actor.subject.as_deref().unwrap_or("-"),
      role = actor.role.as_str(),
      "non-admin actor rejected"
    );
    return Err(Error::Forbidden);
  }
  Ok(())
}
