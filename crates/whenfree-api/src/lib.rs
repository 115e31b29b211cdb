//! HTTP API for the "When Are You Free" meetup scheduler.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`POST /meetup`** to create a meetup, with the caller registered as
//!   its creator and only participant
//! - **`GET /meetup/{uuid}`** to fetch a meetup the caller is invited to
//! - **`GET /health`** as a liveness probe
//!
//! # Authentication
//!
//! Callers identify themselves with an opaque capability token in the
//! `X-User-Token` header. There are no accounts: a token grants access to
//! exactly the meetups whose invite list contains it.
//!
//! # Architecture
//!
//! Handlers share one [`whenfree_store::Storage`] through [`AppState`].
//! The storage coordinator serializes writers against readers, so the
//! handlers themselves hold no locks.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod views;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, shutdown_signal, start_server};
pub use state::{AccessPolicy, AppState};
