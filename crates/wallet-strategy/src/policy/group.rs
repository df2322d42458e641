//! Groups: named aggregates of key-bind snapshots.
//!
//! A group owns full copies of the key-binds it was created from. Editing or
//! removing a key-bind afterwards does not change the group.

use serde::{Deserialize, Serialize};

use crate::address::Address;

use super::key_bind::KeyBind;

/// One authorization unit: the key-bind policies captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Key-bind snapshots, in the order they were named at creation.
    pub key_binds: Vec<KeyBind>,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: i64,
}

impl Group {
    pub fn key_bind_names(&self) -> Vec<&str> {
        self.key_binds.iter().map(|kb| kb.name.as_str()).collect()
    }

    /// The snapshot of a key-bind by name.
    pub fn key_bind(&self, name: &str) -> Option<&KeyBind> {
        self.key_binds.iter().find(|kb| kb.name == name)
    }

    /// Distinct addresses covered by this group, in snapshot order.
    pub fn addresses(&self) -> Vec<&Address> {
        let mut out: Vec<&Address> = Vec::new();
        for kb in &self.key_binds {
            if !out.contains(&&kb.address) {
                out.push(&kb.address);
            }
        }
        out
    }

    /// The first key-bind snapshot that permits the request, if any.
    pub fn matching_key_bind(
        &self,
        address: &Address,
        code: u32,
        method: Option<&str>,
    ) -> Option<&KeyBind> {
        self.key_binds
            .iter()
            .find(|kb| kb.permits(address, code, method))
    }

    /// True when the union of the snapshots permits the request.
    pub fn permits(&self, address: &Address, code: u32, method: Option<&str>) -> bool {
        self.matching_key_bind(address, code, method).is_some()
    }
}
