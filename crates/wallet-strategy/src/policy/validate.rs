//! Argument checks shared by every store operation.

use crate::error::{Result, StrategyError};
use crate::set::{CodeSet, MethodSet};

/// Reject blank entity names.
pub fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StrategyError::InvalidArgument(format!(
            "{kind} name must not be empty"
        )));
    }
    Ok(())
}

/// Collect codes into a set, rejecting an empty input.
pub fn require_codes(kind: &str, codes: &[u32]) -> Result<CodeSet> {
    if codes.is_empty() {
        return Err(StrategyError::InvalidArgument(format!(
            "{kind} requires at least one code"
        )));
    }
    Ok(codes.iter().copied().collect())
}

/// Reject a resolved code set that came out empty (an aggregate with no
/// leaves, or one that only refers back to itself).
pub fn require_resolved(kind: &str, codes: CodeSet) -> Result<CodeSet> {
    if codes.is_empty() {
        return Err(StrategyError::InvalidArgument(format!(
            "{kind} codes resolve to no message types"
        )));
    }
    Ok(codes)
}

/// Collect method names into a set. Every name must be non-blank; surrounding
/// whitespace is trimmed. An empty input is allowed only when `allow_empty`.
pub fn method_set<S: AsRef<str>>(kind: &str, methods: &[S], allow_empty: bool) -> Result<MethodSet> {
    if methods.is_empty() && !allow_empty {
        return Err(StrategyError::InvalidArgument(format!(
            "{kind} requires at least one method"
        )));
    }
    let mut set = MethodSet::new();
    for method in methods {
        let method = method.as_ref().trim();
        if method.is_empty() {
            return Err(StrategyError::InvalidArgument(format!(
                "{kind}: method names must not be empty"
            )));
        }
        set.insert(method.to_string());
    }
    Ok(set)
}
