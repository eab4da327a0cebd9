//! Core types and operations for the TalentProof contact-request desk.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ContactRequestStore`]; the HTTP layer
//! resolves an [`access::Actor`] and calls into [`query`] and [`lifecycle`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod query;
pub mod request;
pub mod store;
pub mod talent;

pub use error::{Error, Result, ValidationErrors};

#[cfg(test)]
mod tests;
