//! Contact requests: a recruiter's inquiry about one talent.
//!
//! Every field except `status` (and the store-maintained `updated_at`) is
//! fixed at creation. The status is a two-state machine with no guard on the
//! direction of a transition.

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ValidationErrors,
  talent::{TalentBrief, TalentListing},
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Triage state of a contact request.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
  #[default]
  New,
  Processed,
}

impl ContactStatus {
  pub const ALL: [ContactStatus; 2] = [Self::New, Self::Processed];

  /// The value stored in the `status` column and used on the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Processed => "processed",
    }
  }
}

impl fmt::Display for ContactStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned when a string is not one of the enumerated status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contact status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ContactStatus {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "new" => Ok(Self::New),
      "processed" => Ok(Self::Processed),
      other => Err(UnknownStatus(other.to_owned())),
    }
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A persisted contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
  pub id:              Uuid,
  pub talent_id:       Uuid,
  pub recruiter_name:  String,
  /// Always lowercase.
  pub recruiter_email: String,
  pub recruiter_phone: String,
  pub company_name:    String,
  pub message:         String,
  pub status:          ContactStatus,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// A contact request as shown in the admin listing, with its talent reduced
/// to the listing projection. `talent` is `None` when the referenced talent
/// no longer exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestView {
  #[serde(flatten)]
  pub request: ContactRequest,
  pub talent:  Option<TalentListing>,
}

/// A single contact request with the narrower talent projection returned by
/// lookups and status transitions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestDetail {
  #[serde(flatten)]
  pub request: ContactRequest,
  pub talent:  Option<TalentBrief>,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Raw submission from the recruiter-facing form. Nothing here is trusted
/// until [`ContactRequestDraft::validate`] succeeds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequestDraft {
  pub talent_id:       Option<Uuid>,
  pub recruiter_name:  String,
  pub recruiter_email: String,
  pub recruiter_phone: String,
  pub company_name:    String,
  pub message:         String,
}

/// Validated input to
/// [`ContactRequestStore::insert_contact_request`](crate::store::ContactRequestStore::insert_contact_request).
///
/// Strings are trimmed and the email is lowercased. `id`, `status` and the
/// timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactRequest {
  pub talent_id:       Uuid,
  pub recruiter_name:  String,
  pub recruiter_email: String,
  pub recruiter_phone: String,
  pub company_name:    String,
  pub message:         String,
}

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Whether `s` looks like `local@domain.tld`. Deliberately loose.
pub fn is_email_shaped(s: &str) -> bool { EMAIL_SHAPE.is_match(s) }

fn required(
  errors: &mut ValidationErrors,
  field: &'static str,
  value: &str,
  message: &str,
) -> String {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    errors.add(field, message);
  }
  trimmed.to_owned()
}

impl ContactRequestDraft {
  /// Check every field and normalise the accepted values.
  ///
  /// All failures are collected, not just the first one.
  pub fn validate(self) -> Result<NewContactRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if self.talent_id.is_none() {
      errors.add("talentId", "Le talent concerné est requis");
    }

    let recruiter_name = required(
      &mut errors,
      "recruiterName",
      &self.recruiter_name,
      "Le nom du recruteur est requis",
    );

    let recruiter_email = required(
      &mut errors,
      "recruiterEmail",
      &self.recruiter_email,
      "L'email du recruteur est requis",
    )
    .to_lowercase();
    if !recruiter_email.is_empty() && !is_email_shaped(&recruiter_email) {
      errors.add("recruiterEmail", "Veuillez fournir un email valide");
    }

    let recruiter_phone = required(
      &mut errors,
      "recruiterPhone",
      &self.recruiter_phone,
      "Le téléphone du recruteur est requis",
    );
    let company_name = required(
      &mut errors,
      "companyName",
      &self.company_name,
      "Le nom de l'entreprise est requis",
    );
    let message = required(
      &mut errors,
      "message",
      &self.message,
      "Le message est requis",
    );

    let Some(talent_id) = self.talent_id else {
      return Err(errors);
    };

    errors.finish(NewContactRequest {
      talent_id,
      recruiter_name,
      recruiter_email,
      recruiter_phone,
      company_name,
      message,
    })
  }
}
