//! Tubely data access layer
//!
//! Repositories for video records. The upload pipeline only needs lookup and
//! update; creation is exposed for seeding and tests.

pub mod db;

pub use db::{InMemoryVideoRepository, MediaSlot, VideoRepository};
