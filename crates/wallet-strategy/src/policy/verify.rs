//! Policy verification: deciding a signing request against a group.
//!
//! Verification checks, in order:
//! 1. Address bound (some key-bind snapshot covers the address)
//! 2. Code allowed (one of those snapshots lists the code)
//! 3. Method allowed (that snapshot lists the method, when one is given)

use crate::address::Address;

use super::group::Group;

/// Result of checking one request against a group.
#[derive(Debug, Clone)]
pub struct PolicyVerification {
    pub group: String,
    /// Is any key-bind in the group bound to the address?
    pub address_bound: bool,
    /// Does a key-bind for the address list the code?
    pub code_allowed: bool,
    /// Key-bind that permitted the request.
    pub matched_key_bind: Option<String>,
    /// Overall decision.
    pub is_permitted: bool,
    /// Verification timestamp.
    pub verified_at: i64,
}

impl PolicyVerification {
    /// Why the request was denied, or `None` if it was permitted.
    pub fn denial_reason(&self) -> Option<&'static str> {
        if self.is_permitted {
            None
        } else if !self.address_bound {
            Some("address not bound in group")
        } else if !self.code_allowed {
            Some("message type not allowed")
        } else {
            Some("method not allowed")
        }
    }
}

/// Verify a request against a group snapshot.
pub fn verify_group_policy(
    group: &Group,
    address: &Address,
    code: u32,
    method: Option<&str>,
) -> PolicyVerification {
    let bound: Vec<_> = group
        .key_binds
        .iter()
        .filter(|kb| &kb.address == address)
        .collect();

    let address_bound = !bound.is_empty();
    let code_allowed = bound.iter().any(|kb| kb.allows_code(code));
    let matched_key_bind = bound
        .iter()
        .find(|kb| kb.allows_code(code) && kb.allows_method(method))
        .map(|kb| kb.name.clone());

    PolicyVerification {
        group: group.name.clone(),
        address_bound,
        code_allowed,
        is_permitted: matched_key_bind.is_some(),
        matched_key_bind,
        verified_at: crate::time::now_micros(),
    }
}
