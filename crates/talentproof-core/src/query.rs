//! The admin listing: filter, search, paginate, and count by status.

use serde::Serialize;

use crate::{
  Error, Result,
  access::{Actor, require_admin},
  request::ContactRequestView,
  store::{ContactRequestFilter, ContactRequestQuery, ContactRequestStore, StatusCounts},
};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Which page to return and how large pages are. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
  page:  u32,
  limit: u32,
}

impl Default for PageSpec {
  fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

impl PageSpec {
  /// Zero falls back to the default for that field.
  pub fn new(page: u32, limit: u32) -> Self {
    Self {
      page:  if page == 0 { DEFAULT_PAGE } else { page },
      limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
    }
  }

  /// Coerce raw query-string values. Missing, non-numeric, and non-positive
  /// values fall back to the defaults; nothing here is an error.
  pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
    fn coerce(raw: Option<&str>) -> u32 {
      raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n >= 1)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
    }
    Self::new(coerce(page), coerce(limit))
  }

  pub fn page(self) -> u32 { self.page }

  pub fn limit(self) -> u32 { self.limit }

  pub fn offset(self) -> u64 { u64::from(self.page - 1) * u64::from(self.limit) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub current_page:   u32,
  pub total_pages:    u64,
  pub total_items:    u64,
  pub items_per_page: u32,
}

impl Pagination {
  pub fn new(page: PageSpec, total_items: u64) -> Self {
    Self {
      current_page: page.page(),
      total_pages: total_items.div_ceil(u64::from(page.limit())),
      total_items,
      items_per_page: page.limit(),
    }
  }
}

/// Result of [`list_contact_requests`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequestListing {
  pub items:      Vec<ContactRequestView>,
  /// Global counts; not narrowed by the filter.
  pub stats:      StatusCounts,
  pub pagination: Pagination,
}

/// List contact requests for an administrator.
///
/// `items` honours both `filter` and `page`; `pagination` honours only
/// `filter`; `stats` honours neither. A page past the end is empty.
pub async fn list_contact_requests<S>(
  store: &S,
  actor: &Actor,
  filter: ContactRequestFilter,
  page: PageSpec,
) -> Result<ContactRequestListing>
where
  S: ContactRequestStore,
{
  require_admin(actor)?;

  let query = ContactRequestQuery {
    filter: ContactRequestFilter {
      search: filter.search_term().map(str::to_owned),
      ..filter
    },
    offset: page.offset(),
    limit:  u64::from(page.limit()),
  };

  let found = store
    .list_contact_requests(&query)
    .await
    .map_err(Error::store)?;
  let stats = store.status_counts().await.map_err(Error::store)?;

  tracing::debug!(
    page = page.page(),
    limit = page.limit(),
    matching = found.total_matching,
    returned = found.items.len(),
    "listed contact requests"
  );

  Ok(ContactRequestListing {
    items: found.items,
    stats,
    pagination: Pagination::new(page, found.total_matching),
  })
}
