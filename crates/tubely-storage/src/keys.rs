//! Shared key generation for published objects.
//!
//! Key format: `{prefix}/{token}.{extension}`. Uniqueness relies on the
//! token's 256 bits of entropy; the store is never consulted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::traits::{StorageError, StorageResult};

/// Number of random bytes drawn per key.
pub const TOKEN_BYTES: usize = 32;

/// Draw [`TOKEN_BYTES`] from the OS random source and encode them as
/// URL-safe base64 without padding (43 characters).
pub fn generate_token() -> StorageResult<String> {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| StorageError::Entropy(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Generate an object key for the given prefix and extension.
///
/// The extension is given without the leading dot.
pub fn generate_object_key(prefix: &str, extension: &str) -> StorageResult<String> {
    let token = generate_token()?;
    Ok(format!("{}/{}.{}", prefix, token, extension))
}
