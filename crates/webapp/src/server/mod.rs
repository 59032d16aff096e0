//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Render server-side views (askama) or redirect, per handler outcome.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod state;
pub mod views;
