//! Notification dispatch, the email side channel of the contact desk.
//!
//! The desk decides *when* to notify and what to say; a [`Notifier`]
//! implementation owns the transport. Delivery failures are logged and
//! swallowed by [`Dispatcher`]: a lost email never fails or undoes the
//! operation that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::{request::ContactRequest, talent::Talent};

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("invalid recipient: {0:?}")]
  InvalidRecipient(String),

  #[error("transport error: {0}")]
  Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  /// Tells the administrators a new request is waiting.
  AdminAlert,
  /// Confirms receipt to the recruiter.
  RecruiterAcknowledgement,
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
  pub kind:    NotificationKind,
  pub to:      String,
  pub subject: String,
  pub body:    String,
}

impl Notification {
  pub fn admin_alert(
    admin_address: &str,
    request: &ContactRequest,
    talent: &Talent,
  ) -> Self {
    Self {
      kind:    NotificationKind::AdminAlert,
      to:      admin_address.to_owned(),
      subject: format!(
        "Nouvelle demande de contact pour {}",
        talent.display_name
      ),
      body:    format!(
        "{name} ({company}) souhaite contacter {talent}.\n\n\
         Email : {email}\nTéléphone : {phone}\n\nMessage :\n{message}\n\n\
         Référence : {id}",
        name = request.recruiter_name,
        company = request.company_name,
        talent = talent.display_name,
        email = request.recruiter_email,
        phone = request.recruiter_phone,
        message = request.message,
        id = request.id,
      ),
    }
  }

  pub fn recruiter_acknowledgement(
    request: &ContactRequest,
    talent: &Talent,
  ) -> Self {
    Self {
      kind:    NotificationKind::RecruiterAcknowledgement,
      to:      request.recruiter_email.clone(),
      subject: "Votre demande de contact a bien été reçue".to_owned(),
      body:    format!(
        "Bonjour {name},\n\nNous avons bien reçu votre demande concernant \
         {talent}. Notre équipe revient vers vous rapidement.\n\n\
         L'équipe TalentProof",
        name = request.recruiter_name,
        talent = talent.display_name,
      ),
    }
  }
}

/// A transport able to deliver a [`Notification`].
#[async_trait]
pub trait Notifier: Send + Sync {
  async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Logs each notification instead of sending it. The default transport when
/// no mail relay is configured.
#[derive(Debug, Clone)]
pub struct TracingNotifier {
  pub from: String,
}

#[async_trait]
impl Notifier for TracingNotifier {
  async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
    if !crate::request::is_email_shaped(&notification.to) {
      return Err(NotifyError::InvalidRecipient(notification.to.clone()));
    }
    tracing::info!(
      from = %self.from,
      to = %notification.to,
      kind = ?notification.kind,
      subject = %notification.subject,
      "email dispatched"
    );
    Ok(())
  }
}

/// Sends notifications on behalf of the lifecycle controller.
#[derive(Clone)]
pub struct Dispatcher {
  notifier:      Arc<dyn Notifier>,
  admin_address: String,
}

impl Dispatcher {
  pub fn new(notifier: Arc<dyn Notifier>, admin_address: impl Into<String>) -> Self {
    Self { notifier, admin_address: admin_address.into() }
  }

  pub fn admin_address(&self) -> &str { &self.admin_address }

  /// Deliver `notification`, logging instead of returning any failure.
  /// Returns whether the transport accepted it.
  pub async fn dispatch(&self, notification: Notification) -> bool {
    match self.notifier.send(&notification).await {
      Ok(()) => true,
      Err(err) => {
        tracing::warn!(
          to = %notification.to,
          kind = ?notification.kind,
          error = %err,
          "notification delivery failed"
        );
        false
      }
    }
  }

  /// Everything sent when a recruiter submits a request.
  pub async fn contact_request_submitted(
    &self,
    request: &ContactRequest,
    talent: &Talent,
  ) {
    self
      .dispatch(Notification::admin_alert(&self.admin_address, request, talent))
      .await;
    self
      .dispatch(Notification::recruiter_acknowledgement(request, talent))
      .await;
  }
}

impl std::fmt::Debug for Dispatcher {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Dispatcher")
      .field("admin_address", &self.admin_address)
      .finish_non_exhaustive()
  }
}
