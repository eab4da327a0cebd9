//! The `ContactRequestStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `talentproof-store-sqlite`). The query engine and lifecycle controller
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  request::{
    ContactRequest, ContactRequestDetail, ContactRequestView, ContactStatus,
    NewContactRequest,
  },
  talent::{NewTalent, Talent},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Restriction on the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(ContactStatus),
}

impl StatusFilter {
  /// Parse the `statut` query value. Anything that is neither `all` nor a
  /// known status falls back to [`StatusFilter::All`].
  pub fn from_param(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      None | Some("" | "all") => Self::All,
      Some(other) => other.parse().map(Self::Only).unwrap_or_default(),
    }
  }

  pub fn status(self) -> Option<ContactStatus> {
    match self {
      Self::All => None,
      Self::Only(s) => Some(s),
    }
  }
}

/// Which contact requests to consider. Pagination is applied separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRequestFilter {
  pub status:    StatusFilter,
  /// Case-insensitive substring over recruiter name, recruiter email and
  /// company name. `None` or blank disables the search.
  pub search:    Option<String>,
  /// Restrict to the requests about one talent.
  pub talent_id: Option<Uuid>,
}

impl ContactRequestFilter {
  /// The trimmed search needle, if any.
  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }
}

/// Parameters for [`ContactRequestStore::list_contact_requests`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequestQuery {
  pub filter: ContactRequestFilter,
  pub offset: u64,
  pub limit:  u64,
}

/// One page of matching requests plus the number of matches overall.
#[derive(Debug, Clone)]
pub struct ContactRequestPage {
  pub items:          Vec<ContactRequestView>,
  /// Matches for the filter, ignoring `offset`/`limit`.
  pub total_matching: u64,
}

/// Per-status counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
  pub new:       u64,
  pub processed: u64,
  pub total:     u64,
}

impl StatusCounts {
  /// Build from `(status, count)` pairs; `total` is always the sum.
  pub fn from_pairs(pairs: impl IntoIterator<Item = (ContactStatus, u64)>) -> Self {
    let mut counts = Self::default();
    for (status, n) in pairs {
      match status {
        ContactStatus::New => counts.new += n,
        ContactStatus::Processed => counts.processed += n,
      }
    }
    counts.total = counts.new + counts.processed;
    counts
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact-request store backend.
///
/// Every method is a single atomic unit of work at the backend's granularity.
/// Nothing here checks roles; that happens in [`crate::query`] and
/// [`crate::lifecycle`] before the store is touched.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactRequestStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Talents ───────────────────────────────────────────────────────────

  /// Persist a new talent. `id` and `created_at` are assigned by the store.
  fn add_talent(
    &self,
    input: NewTalent,
  ) -> impl Future<Output = Result<Talent, Self::Error>> + Send + '_;

  /// Retrieve a talent by id. Returns `None` if not found.
  fn get_talent(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Talent>, Self::Error>> + Send + '_;

  // ── Contact requests ──────────────────────────────────────────────────

  /// Persist a validated request with status `new`. Does not check that the
  /// talent exists beyond what the backend enforces itself.
  fn insert_contact_request(
    &self,
    input: NewContactRequest,
  ) -> impl Future<Output = Result<ContactRequest, Self::Error>> + Send + '_;

  /// Retrieve one request with its brief talent projection.
  fn get_contact_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ContactRequestDetail>, Self::Error>>
  + Send
  + '_;

  /// Matching requests, newest first, with the listing talent projection.
  fn list_contact_requests<'a>(
    &'a self,
    query: &'a ContactRequestQuery,
  ) -> impl Future<Output = Result<ContactRequestPage, Self::Error>> + Send + 'a;

  /// Per-status counts over every stored request, whatever the filter.
  fn status_counts(
    &self,
  ) -> impl Future<Output = Result<StatusCounts, Self::Error>> + Send + '_;

  /// Overwrite `status` and bump `updated_at`. Returns `None` if no request
  /// has this id.
  fn set_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> impl Future<Output = Result<Option<ContactRequestDetail>, Self::Error>>
  + Send
  + '_;

  /// Hard-delete. Returns `false` if no request has this id.
  fn delete_contact_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_filter_from_param() {
    assert_eq!(StatusFilter::from_param(None), StatusFilter::All);
    assert_eq!(StatusFilter::from_param(Some("all")), StatusFilter::All);
    assert_eq!(
      StatusFilter::from_param(Some("new")),
      StatusFilter::Only(ContactStatus::New)
    );
    assert_eq!(
      StatusFilter::from_param(Some(" processed ")),
      StatusFilter::Only(ContactStatus::Processed)
    );
    assert_eq!(StatusFilter::from_param(Some("archived")), StatusFilter::All);
  }

  #[test]
  fn counts_total_is_sum() {
    let counts = StatusCounts::from_pairs([
      (ContactStatus::New, 2),
      (ContactStatus::Processed, 1),
    ]);
    assert_eq!(counts, StatusCounts { new: 2, processed: 1, total: 3 });
  }

  #[test]
  fn blank_search_is_no_search() {
    let filter = ContactRequestFilter {
      search: Some("   ".into()),
      ..Default::default()
    };
    assert_eq!(filter.search_term(), None);
  }
}
