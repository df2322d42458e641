//! Message-type code registry.
//!
//! Maps leaf codes to display names and aggregate markers to their member
//! codes. Members of an aggregate may themselves be aggregates; expansion is
//! done by [`resolve`](super::resolve::resolve).
//!
//! The built-in registry carries the wallet message types:
//!
//! ```text
//!  0 unknown            6 storage_ask
//!  1 chain_msg          7 ask_response
//!  2 block              8 network_response
//!  3 deal_proposal      9 provider_deal_state
//!  4 draw_random_param 10 client_deal
//!  5 signed_voucher    11 verify_address
//!
//! 1000 market = deal, 5, 6, 7, 8
//! 1001 deal   = 3, 9, 10
//! 1002 mining = 2, 4
//! 1003 all    = 0, 1, 11, market, mining
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::set::CodeSet;

/// First code of the range reserved for aggregate markers.
pub const AGGREGATE_BASE: u32 = 1000;

const BUILTIN_LEAVES: &[(u32, &str)] = &[
    (0, "unknown"),
    (1, "chain_msg"),
    (2, "block"),
    (3, "deal_proposal"),
    (4, "draw_random_param"),
    (5, "signed_voucher"),
    (6, "storage_ask"),
    (7, "ask_response"),
    (8, "network_response"),
    (9, "provider_deal_state"),
    (10, "client_deal"),
    (11, "verify_address"),
];

const BUILTIN_AGGREGATES: &[(u32, &str, &[u32])] = &[
    (1000, "market", &[1001, 5, 6, 7, 8]),
    (1001, "deal", &[3, 9, 10]),
    (1002, "mining", &[2, 4]),
    (1003, "all", &[0, 1, 11, 1000, 1002]),
];

/// Lookup table of code names and aggregate memberships.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    names: BTreeMap<u32, String>,
    aggregates: HashMap<u32, Vec<u32>>,
}

impl CodeRegistry {
    /// A registry that knows no codes; every code resolves to itself.
    pub fn empty() -> Self {
        Self {
            names: BTreeMap::new(),
            aggregates: HashMap::new(),
        }
    }

    /// Start building a custom registry.
    pub fn builder() -> CodeRegistryBuilder {
        CodeRegistryBuilder {
            registry: Self::empty(),
        }
    }

    /// Display name of a leaf code or aggregate marker.
    pub fn name(&self, code: u32) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Look up a code by its display name.
    pub fn code_by_name(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(code, _)| *code)
    }

    /// Direct members of an aggregate marker, or `None` for leaf/unknown codes.
    pub fn members(&self, code: u32) -> Option<&[u32]> {
        self.aggregates.get(&code).map(Vec::as_slice)
    }

    pub fn is_aggregate(&self, code: u32) -> bool {
        self.aggregates.contains_key(&code)
    }

    /// All named codes, leaves and aggregates, in ascending order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names.iter().map(|(code, name)| (*code, name.as_str()))
    }

    /// Expand `codes` into leaf codes using this registry.
    pub fn resolve<I>(&self, codes: I) -> CodeSet
    where
        I: IntoIterator<Item = u32>,
    {
        super::resolve::resolve(self, codes)
    }

    /// Human readable form: `name(code)` for known codes, the bare number otherwise.
    pub fn describe(&self, code: u32) -> String {
        match self.name(code) {
            Some(name) => format!("{name}({code})"),
            None => code.to_string(),
        }
    }
}

impl Default for CodeRegistry {
    fn default() -> Self {
        let mut builder = Self::builder();
        for (code, name) in BUILTIN_LEAVES {
            builder = builder.leaf(*code, *name);
        }
        for (code, name, members) in BUILTIN_AGGREGATES {
            builder = builder.aggregate(*code, *name, members.iter().copied());
        }
        builder.build()
    }
}

/// Builder for [`CodeRegistry`].
pub struct CodeRegistryBuilder {
    registry: CodeRegistry,
}

impl CodeRegistryBuilder {
    /// Register a named leaf code.
    pub fn leaf(mut self, code: u32, name: impl Into<String>) -> Self {
        self.registry.names.insert(code, name.into());
        self
    }

    /// Register an aggregate marker with its members.
    pub fn aggregate<I>(mut self, code: u32, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.registry.names.insert(code, name.into());
        self.registry
            .aggregates
            .insert(code, members.into_iter().collect());
        self
    }

    pub fn build(self) -> CodeRegistry {
        self.registry
    }
}
