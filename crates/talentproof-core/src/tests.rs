//! Desk operations against an in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{
  Error,
  access::Actor,
  lifecycle::{
    delete_contact_request, get_contact_request, register_talent, set_status,
    submit_contact_request,
  },
  notify::{Dispatcher, Notification, NotificationKind, Notifier, NotifyError},
  query::{PageSpec, list_contact_requests},
  request::{
    ContactRequest, ContactRequestDetail, ContactRequestDraft, ContactRequestView,
    ContactStatus, NewContactRequest,
  },
  store::{
    ContactRequestFilter, ContactRequestPage, ContactRequestQuery, ContactRequestStore,
    StatusCounts, StatusFilter,
  },
  talent::{NewTalent, Talent},
};

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
  inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
  talents:  Vec<Talent>,
  /// Insertion order.
  requests: Vec<ContactRequest>,
  ticks:    i64,
}

impl Inner {
  /// Strictly increasing timestamps so ordering is deterministic.
  fn tick(&mut self) -> DateTime<Utc> {
    self.ticks += 1;
    DateTime::UNIX_EPOCH + TimeDelta::seconds(self.ticks)
  }

  fn detail(&self, r: &ContactRequest) -> ContactRequestDetail {
    ContactRequestDetail {
      request: r.clone(),
      talent:  self
        .talents
        .iter()
        .find(|t| t.id == r.talent_id)
        .cloned()
        .map(Into::into),
    }
  }
}

fn matches(filter: &ContactRequestFilter, r: &ContactRequest) -> bool {
  if let Some(status) = filter.status.status()
    && r.status != status
  {
    return false;
  }
  if let Some(talent_id) = filter.talent_id
    && r.talent_id != talent_id
  {
    return false;
  }
  match filter.search_term() {
    None => true,
    Some(needle) => {
      let needle = needle.to_lowercase();
      [&r.recruiter_name, &r.recruiter_email, &r.company_name]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
  }
}

impl ContactRequestStore for MemoryStore {
  type Error = std::convert::Infallible;

  async fn add_talent(&self, input: NewTalent) -> Result<Talent, Self::Error> {
    let mut inner = self.inner.lock().unwrap();
    let talent = Talent {
      id:           Uuid::new_v4(),
      display_name: input.display_name,
      photo:        input.photo,
      technologies: input.technologies,
      score:        input.score,
      availability: input.availability,
      created_at:   inner.tick(),
    };
    inner.talents.push(talent.clone());
    Ok(talent)
  }

  async fn get_talent(&self, id: Uuid) -> Result<Option<Talent>, Self::Error> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.talents.iter().find(|t| t.id == id).cloned())
  }

  async fn insert_contact_request(
    &self,
    input: NewContactRequest,
  ) -> Result<ContactRequest, Self::Error> {
    let mut inner = self.inner.lock().unwrap();
    let now = inner.tick();
    let request = ContactRequest {
      id:              Uuid::new_v4(),
      talent_id:       input.talent_id,
      recruiter_name:  input.recruiter_name,
      recruiter_email: input.recruiter_email,
      recruiter_phone: input.recruiter_phone,
      company_name:    input.company_name,
      message:         input.message,
      status:          ContactStatus::New,
      created_at:      now,
      updated_at:      now,
    };
    inner.requests.push(request.clone());
    Ok(request)
  }

  async fn get_contact_request(
    &self,
    id: Uuid,
  ) -> Result<Option<ContactRequestDetail>, Self::Error> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.requests.iter().find(|r| r.id == id).map(|r| inner.detail(r)))
  }

  async fn list_contact_requests<'a>(
    &'a self,
    query: &'a ContactRequestQuery,
  ) -> Result<ContactRequestPage, Self::Error> {
    let inner = self.inner.lock().unwrap();
    let matching: Vec<&ContactRequest> = inner
      .requests
      .iter()
      .rev()
      .filter(|r| matches(&query.filter, r))
      .collect();
    let items = matching
      .iter()
      .skip(query.offset as usize)
      .take(query.limit as usize)
      .map(|r| ContactRequestView {
        request: (*r).clone(),
        talent:  inner
          .talents
          .iter()
          .find(|t| t.id == r.talent_id)
          .cloned()
          .map(Into::into),
      })
      .collect();
    Ok(ContactRequestPage { items, total_matching: matching.len() as u64 })
  }

  async fn status_counts(&self) -> Result<StatusCounts, Self::Error> {
    let inner = self.inner.lock().unwrap();
    Ok(StatusCounts::from_pairs(
      inner.requests.iter().map(|r| (r.status, 1)),
    ))
  }

  async fn set_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> Result<Option<ContactRequestDetail>, Self::Error> {
    let mut inner = self.inner.lock().unwrap();
    let now = inner.tick();
    let Some(idx) = inner.requests.iter().position(|r| r.id == id) else {
      return Ok(None);
    };
    inner.requests[idx].status = status;
    inner.requests[idx].updated_at = now;
    let updated = inner.requests[idx].clone();
    Ok(Some(inner.detail(&updated)))
  }

  async fn delete_contact_request(&self, id: Uuid) -> Result<bool, Self::Error> {
    let mut inner = self.inner.lock().unwrap();
    let before = inner.requests.len();
    inner.requests.retain(|r| r.id != id);
    Ok(inner.requests.len() != before)
  }
}

// ─── Notifier doubles ────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingNotifier {
  sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
  async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
    self.sent.lock().unwrap().push(notification.clone());
    Ok(())
  }
}

struct BrokenNotifier;

#[async_trait]
impl Notifier for BrokenNotifier {
  async fn send(&self, _: &Notification) -> Result<(), NotifyError> {
    Err(NotifyError::Transport("relay unreachable".into()))
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn admin() -> Actor { Actor::authenticated("admin@talentproof.fr", "admin") }

fn recruiter() -> Actor { Actor::authenticated("r@acme.fr", "recruiter") }

fn draft(talent_id: Uuid, name: &str, email: &str, company: &str) -> ContactRequestDraft {
  ContactRequestDraft {
    talent_id:       Some(talent_id),
    recruiter_name:  name.into(),
    recruiter_email: email.into(),
    recruiter_phone: "0102030405".into(),
    company_name:    company.into(),
    message:         "Disponible pour un échange ?".into(),
  }
}

async fn talent(store: &MemoryStore) -> Talent {
  let mut input = NewTalent::new("Inès Dupont");
  input.technologies = vec!["Rust".into(), "Kafka".into()];
  input.score = 92;
  input.photo = Some("/photos/ines.jpg".into());
  input.availability = "immédiate".into();
  register_talent(store, &admin(), input).await.unwrap()
}

fn quiet() -> Dispatcher {
  Dispatcher::new(Arc::new(RecordingNotifier::default()), "admin@talentproof.fr")
}

async fn submit(store: &MemoryStore, d: ContactRequestDraft) -> ContactRequest {
  submit_contact_request(store, &quiet(), d).await.unwrap()
}

/// Three requests with statuses `[new, processed, new]`, oldest first.
async fn seeded() -> (MemoryStore, Vec<ContactRequest>) {
  let store = MemoryStore::default();
  let t = talent(&store).await;
  let a = submit(&store, draft(t.id, "Alice Martin", "alice@acme.fr", "Acme")).await;
  let b = submit(&store, draft(t.id, "Bruno Petit", "bruno@globex.com", "Globex")).await;
  let c = submit(&store, draft(t.id, "Chloé Durand", "chloe@initech.io", "Initech")).await;
  set_status(&store, &admin(), b.id, "processed").await.unwrap();
  (store, vec![a, b, c])
}

async fn stored_status(store: &MemoryStore, id: Uuid) -> ContactStatus {
  store.get_contact_request(id).await.unwrap().unwrap().request.status
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_scenario_counts_and_orders_newest_first() {
  let (store, reqs) = seeded().await;

  let listing = list_contact_requests(
    &store,
    &admin(),
    ContactRequestFilter::default(),
    PageSpec::new(1, 10),
  )
  .await
  .unwrap();

  assert_eq!(listing.stats, StatusCounts { new: 2, processed: 1, total: 3 });
  let ids: Vec<Uuid> = listing.items.iter().map(|v| v.request.id).collect();
  assert_eq!(ids, [reqs[2].id, reqs[1].id, reqs[0].id]);
  assert_eq!(listing.pagination.total_items, 3);
  assert_eq!(listing.pagination.total_pages, 1);

  let talent = listing.items[0].talent.as_ref().unwrap();
  assert_eq!(talent.display_name, "Inès Dupont");
  assert_eq!(talent.score, 92);
}

#[tokio::test]
async fn stats_ignore_the_filter() {
  let (store, _) = seeded().await;

  let filter = ContactRequestFilter {
    status: StatusFilter::Only(ContactStatus::Processed),
    search: Some("globex".into()),
    ..Default::default()
  };
  let listing = list_contact_requests(&store, &admin(), filter, PageSpec::default())
    .await
    .unwrap();

  assert_eq!(listing.items.len(), 1);
  assert_eq!(listing.pagination.total_items, 1);
  assert_eq!(listing.stats.total, 3);
  assert_eq!(listing.stats.new + listing.stats.processed, listing.stats.total);
}

#[tokio::test]
async fn search_matches_any_of_three_fields_case_insensitively() {
  let (store, reqs) = seeded().await;

  let search = |s: &str| ContactRequestFilter {
    search: Some(s.into()),
    ..Default::default()
  };

  for (needle, expected) in [
    ("MARTIN", vec![reqs[0].id]),
    ("globex.COM", vec![reqs[1].id]),
    ("nitec", vec![reqs[2].id]),
    ("CHLOÉ", vec![reqs[2].id]),
    ("@", vec![reqs[2].id, reqs[1].id, reqs[0].id]),
    ("Disponible", vec![]),
  ] {
    let listing =
      list_contact_requests(&store, &admin(), search(needle), PageSpec::default())
        .await
        .unwrap();
    let ids: Vec<Uuid> = listing.items.iter().map(|v| v.request.id).collect();
    assert_eq!(ids, expected, "search {needle:?}");
  }
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() {
  let (store, _) = seeded().await;

  let listing = list_contact_requests(
    &store,
    &admin(),
    ContactRequestFilter::default(),
    PageSpec::new(3, 2),
  )
  .await
  .unwrap();

  assert!(listing.items.is_empty());
  assert_eq!(listing.pagination.current_page, 3);
  assert_eq!(listing.pagination.total_pages, 2);
  assert_eq!(listing.pagination.total_items, 3);
}

#[tokio::test]
async fn second_page_holds_the_oldest() {
  let (store, reqs) = seeded().await;

  let listing = list_contact_requests(
    &store,
    &admin(),
    ContactRequestFilter::default(),
    PageSpec::new(2, 2),
  )
  .await
  .unwrap();

  assert_eq!(listing.items.len(), 1);
  assert_eq!(listing.items[0].request.id, reqs[0].id);
}

// ─── Status transitions ──────────────────────────────────────────────────────

#[tokio::test]
async fn every_transition_is_accepted() {
  let (store, reqs) = seeded().await;
  let id = reqs[0].id;

  for target in ["processed", "processed", "new", "new", "processed"] {
    let updated = set_status(&store, &admin(), id, target).await.unwrap();
    assert_eq!(updated.request.status.as_str(), target);
    assert_eq!(stored_status(&store, id).await.as_str(), target);
  }
}

#[tokio::test]
async fn transition_bumps_updated_at_only() {
  let (store, reqs) = seeded().await;
  let before = &reqs[0];

  let after = set_status(&store, &admin(), before.id, "processed")
    .await
    .unwrap();

  assert!(after.request.updated_at > before.updated_at);
  assert_eq!(after.request.created_at, before.created_at);
  assert_eq!(after.request.recruiter_email, before.recruiter_email);
  assert_eq!(after.talent.unwrap().technologies, ["Rust", "Kafka"]);
}

#[tokio::test]
async fn invalid_status_leaves_entity_untouched() {
  let (store, reqs) = seeded().await;

  let err = set_status(&store, &admin(), reqs[1].id, "traité-invalide")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::InvalidStatus(ref s) if s == "traité-invalide"));
  assert_eq!(stored_status(&store, reqs[1].id).await, ContactStatus::Processed);
}

#[tokio::test]
async fn status_of_unknown_request_is_not_found() {
  let (store, _) = seeded().await;
  let missing = Uuid::new_v4();

  let err = set_status(&store, &admin(), missing, "processed")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ContactRequestNotFound(id) if id == missing));
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_twice_reports_not_found() {
  let (store, reqs) = seeded().await;

  delete_contact_request(&store, &admin(), reqs[0].id)
    .await
    .unwrap();
  let err = delete_contact_request(&store, &admin(), reqs[0].id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ContactRequestNotFound(_)));

  let counts = store.status_counts().await.unwrap();
  assert_eq!(counts.total, 2);
  assert!(store.get_talent(reqs[0].talent_id).await.unwrap().is_some());
}

// ─── Access control ──────────────────────────────────────────────────────────

#[tokio::test]
async fn non_admins_are_rejected_without_mutation() {
  let (store, reqs) = seeded().await;
  let id = reqs[0].id;

  for (actor, expect_unauthorized) in [(Actor::anonymous(), true), (recruiter(), false)] {
    let check = |err: Error| {
      if expect_unauthorized {
        assert!(matches!(err, Error::Unauthorized), "{err:?}");
      } else {
        assert!(matches!(err, Error::Forbidden), "{err:?}");
      }
    };

    check(
      list_contact_requests(&store, &actor, Default::default(), Default::default())
        .await
        .unwrap_err(),
    );
    check(get_contact_request(&store, &actor, id).await.unwrap_err());
    check(set_status(&store, &actor, id, "processed").await.unwrap_err());
    check(set_status(&store, &actor, id, "garbage").await.unwrap_err());
    check(delete_contact_request(&store, &actor, id).await.unwrap_err());
    check(
      register_talent(&store, &actor, NewTalent::new("X"))
        .await
        .unwrap_err(),
    );
  }

  assert_eq!(stored_status(&store, id).await, ContactStatus::New);
  assert_eq!(store.status_counts().await.unwrap().total, 3);
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submission_requires_existing_talent() {
  let store = MemoryStore::default();
  let missing = Uuid::new_v4();

  let err = submit_contact_request(
    &store,
    &quiet(),
    draft(missing, "A", "a@acme.fr", "Acme"),
  )
  .await
  .unwrap_err();

  assert!(matches!(err, Error::TalentNotFound(id) if id == missing));
  assert_eq!(store.status_counts().await.unwrap().total, 0);
}

#[tokio::test]
async fn submission_rejects_invalid_draft() {
  let store = MemoryStore::default();
  let t = talent(&store).await;

  let err = submit_contact_request(
    &store,
    &quiet(),
    draft(t.id, "A", "not-an-email", "Acme"),
  )
  .await
  .unwrap_err();

  assert!(matches!(err, Error::Validation(ref e) if e.contains("recruiterEmail")));
}

#[tokio::test]
async fn submission_notifies_admin_and_recruiter() {
  let store = MemoryStore::default();
  let t = talent(&store).await;
  let notifier = Arc::new(RecordingNotifier::default());
  let dispatcher = Dispatcher::new(notifier.clone(), "admin@talentproof.fr");

  let req = submit_contact_request(
    &store,
    &dispatcher,
    draft(t.id, "Alice", " Alice@Acme.FR ", "Acme"),
  )
  .await
  .unwrap();

  assert_eq!(req.status, ContactStatus::New);
  assert_eq!(req.recruiter_email, "alice@acme.fr");

  let sent = notifier.sent.lock().unwrap();
  assert_eq!(sent.len(), 2);
  assert_eq!(sent[0].kind, NotificationKind::AdminAlert);
  assert_eq!(sent[0].to, "admin@talentproof.fr");
  assert!(sent[0].body.contains(&req.id.to_string()));
  assert_eq!(sent[1].kind, NotificationKind::RecruiterAcknowledgement);
  assert_eq!(sent[1].to, "alice@acme.fr");
}

#[tokio::test]
async fn notification_failure_does_not_fail_submission() {
  let store = MemoryStore::default();
  let t = talent(&store).await;
  let dispatcher = Dispatcher::new(Arc::new(BrokenNotifier), "admin@talentproof.fr");

  let req = submit_contact_request(
    &store,
    &dispatcher,
    draft(t.id, "Alice", "alice@acme.fr", "Acme"),
  )
  .await
  .unwrap();

  assert!(store.get_contact_request(req.id).await.unwrap().is_some());
}

#[tokio::test]
async fn register_talent_validates() {
  let store = MemoryStore::default();
  let err = register_talent(&store, &admin(), NewTalent::new("  "))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(ref e) if e.contains("displayName")));
}
