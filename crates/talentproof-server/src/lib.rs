//! HTTP layer for the TalentProof contact desk.
//!
//! Exposes an axum [`Router`] serving the JSON API backed by any
//! [`ContactRequestStore`]. Every response carries a `success` flag.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use talentproof_core::{notify::Dispatcher, store::ContactRequestStore};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{contact_requests, health, login, talents};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_token_ttl_secs() -> u64 { 24 * 60 * 60 }

fn default_notify_from() -> String { "no-reply@talentproof.fr".to_string() }

/// Runtime server configuration, deserialised from `config.toml` and
/// `TALENTPROOF_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  pub store_path:          PathBuf,
  /// Login for the administrator account; also receives new-request alerts.
  pub admin_email:         String,
  pub admin_password_hash: String,
  pub jwt_secret:          String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs:      u64,
  /// Sender address for outgoing notifications.
  #[serde(default = "default_notify_from")]
  pub notify_from:         String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ContactRequestStore> {
  pub store:      Arc<S>,
  pub auth:       Arc<AuthConfig>,
  pub dispatcher: Dispatcher,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactRequestStore + Clone + 'static,
{
  Router::new()
    .route("/health", get(health::handler))
    .route("/auth/login", post(login::handler::<S>))
    .route(
      "/contact-requests",
      get(contact_requests::list::<S>).post(contact_requests::submit::<S>),
    )
    .route(
      "/contact-requests/{id}",
      get(contact_requests::get_one::<S>).delete(contact_requests::delete_one::<S>),
    )
    .route("/contact-requests/{id}/status", put(contact_requests::update_status::<S>))
    .route("/talents", post(talents::create::<S>))
    .fallback(handlers::not_found)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
