//! Content revisions used as ETags for optimistic concurrency.

use sha2::{Digest, Sha256};

/// SHA-256 of the file bytes, hex encoded.
pub fn revision(bytes: &[u8]) -> String { hex::encode(Sha256::digest(bytes)) }
