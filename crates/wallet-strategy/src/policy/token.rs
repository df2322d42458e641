//! Access tokens bound to a group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::crypto::token_fingerprint;

/// A stored token and the group it grants.
///
/// `Debug` prints a fingerprint instead of the token value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token: String,
    pub group_name: String,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: i64,
}

impl TokenInfo {
    pub fn fingerprint(&self) -> String {
        token_fingerprint(&self.token)
    }
}

impl fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo")
            .field("token", &format_args!("<{}>", self.fingerprint()))
            .field("group_name", &self.group_name)
            .field("created_at", &self.created_at)
            .finish()
    }
}
