//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

use crate::AssetKind;

/// Compute the cache key for one site's asset of the given kind.
pub fn compute_asset_key(url: &str, kind: AssetKind) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(kind.as_str().as_bytes());
    hex::encode(hasher.finalize())
}
