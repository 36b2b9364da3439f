//! `rollcall-arlo` — Arlo management platform API client.
//!
//! Blocking reqwest client (no Tokio runtime required) for the Arlo XML
//! resource API: follows `Link rel="next"` pagination, resolves event
//! codes and session dates to resource ids with per-client caching,
//! streams session registrations, and PATCHes attendance status.
//!
//! No retries, no concurrency, no UI concepts.

mod auth;
mod client;
pub mod xml;

pub use auth::{resolve_credentials, CredentialStore, Credentials, PASSWORD_ENV, USERNAME_ENV};
pub use client::{ArloClient, ArloError, Registrations};
