//! Token material: generation and log-safe fingerprints.

pub mod random;

use sha2::{Digest, Sha256};

pub use random::{generate_token, TOKEN_BYTES};

/// Short SHA-256 fingerprint of a token, safe to write to logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}
