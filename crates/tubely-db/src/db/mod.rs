//! Database repositories for data access layer
//
// Video record repositories
pub mod video;
//
pub use video::{InMemoryVideoRepository, MediaSlot, VideoRepository};
