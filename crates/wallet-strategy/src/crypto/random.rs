//! Secure random token generation.
//!
//! Uses the operating system's cryptographic random source via `rand`.

use rand::RngCore;

/// Number of random bytes behind every token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::rngs::OsRng.fill_bytes(buf);
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    fill_random(&mut buf);
    buf
}

/// Generate a new opaque access token: base58 of 32 random bytes.
pub fn generate_token() -> String {
    bs58::encode(random_bytes::<TOKEN_BYTES>()).into_string()
}
