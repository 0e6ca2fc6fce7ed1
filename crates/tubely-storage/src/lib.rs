//! Tubely Storage Library
//!
//! This crate provides the blob store abstraction used to publish videos and
//! thumbnails. It includes the Storage trait and implementations for S3, the
//! local filesystem and an in-process memory store.
//!
//! # Storage key format
//!
//! Published objects use `{prefix}/{token}.{extension}` where `token` is 32
//! bytes from the OS random source encoded as URL-safe base64 without padding.
//! Video prefixes are the orientation (`landscape`, `portrait`, `other`);
//! thumbnails use `thumbnails`.
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all callers stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
mod object;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_object_key, generate_token};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Credentials, S3Storage};
pub use traits::{ObjectInfo, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
