//! Tubely API Library
//!
//! This crate provides the HTTP handlers, authentication, error rendering and
//! application setup for the video upload service.

pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use auth::JwtAuthenticator;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
