//! Aggregate code expansion.
//!
//! Resolution walks the input in order, replacing every aggregate marker by
//! its members (depth first) and keeping the first occurrence of each leaf.
//! Codes the registry does not know are leaves: they pass through unchanged,
//! so new code families keep working before the registry learns them.

use std::collections::HashSet;

use crate::set::CodeSet;

use super::registry::CodeRegistry;

/// Expand `codes` into a flat, deduplicated set of leaf codes.
///
/// The result never contains an aggregate marker known to `registry`, so
/// `resolve(resolve(s)) == resolve(s)`. Aggregates that reference each other
/// are expanded once.
pub fn resolve<I>(registry: &CodeRegistry, codes: I) -> CodeSet
where
    I: IntoIterator<Item = u32>,
{
    let mut out = CodeSet::new();
    let mut expanded = HashSet::new();
    for code in codes {
        expand(registry, code, &mut expanded, &mut out);
    }
    out
}

fn expand(registry: &CodeRegistry, code: u32, expanded: &mut HashSet<u32>, out: &mut CodeSet) {
    match registry.members(code) {
        Some(members) => {
            if !expanded.insert(code) {
                return;
            }
            for &member in members {
                expand(registry, member, expanded, out);
            }
        }
        None => {
            out.insert(code);
        }
    }
}

/// True when no code in `codes` is an aggregate marker.
pub fn is_resolved(registry: &CodeRegistry, codes: &CodeSet) -> bool {
    codes.iter().all(|code| !registry.is_aggregate(*code))
}
