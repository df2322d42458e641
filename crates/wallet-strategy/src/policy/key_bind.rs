//! Key-binds: per-address policy objects.
//!
//! A key-bind binds one address to a set of message-type codes and a set of
//! method names. Its codes are always stored resolved (no aggregate markers),
//! so set difference on removal works on leaf codes.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::set::{CodeSet, MethodSet};

/// A named policy binding for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBind {
    pub name: String,
    pub address: Address,
    /// Resolved leaf codes, in insertion order.
    pub codes: CodeSet,
    pub methods: MethodSet,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: i64,
}

impl KeyBind {
    /// Union `codes` into this key-bind. `codes` must already be resolved.
    /// Returns the number of codes added.
    pub fn add_codes(&mut self, codes: &CodeSet) -> usize {
        self.codes.union_with(codes)
    }

    /// Remove `codes` from this key-bind. Absent codes are ignored.
    pub fn remove_codes(&mut self, codes: &CodeSet) -> usize {
        self.codes.difference_with(codes)
    }

    pub fn add_methods(&mut self, methods: &MethodSet) -> usize {
        self.methods.union_with(methods)
    }

    pub fn remove_methods(&mut self, methods: &MethodSet) -> usize {
        self.methods.difference_with(methods)
    }

    pub fn allows_code(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    /// Method check. Requests without a method (non-chain messages) pass;
    /// a request naming a method needs that method in the set, so an empty
    /// method set denies every method-bearing request.
    pub fn allows_method(&self, method: Option<&str>) -> bool {
        match method {
            None => true,
            Some(method) => self.methods.iter().any(|m| m == method),
        }
    }

    /// Full check for one signing request.
    pub fn permits(&self, address: &Address, code: u32, method: Option<&str>) -> bool {
        &self.address == address && self.allows_code(code) && self.allows_method(method)
    }
}
