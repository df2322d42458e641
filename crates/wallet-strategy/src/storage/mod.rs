//! Storage layer for templates, key-binds, groups and tokens.
//!
//! Everything lives in one SQLite database under the repo directory:
//!
//! ```text
//! ~/.wallet_strategy/
//! ├── config.json
//! └── strategy.db
//!     ├── msg_type_templates
//!     ├── method_templates
//!     ├── key_binds
//!     ├── strategy_groups
//!     └── tokens
//! ```
//!
//! # Modules
//!
//! - [`schema`]: table definitions and schema versioning.
//! - [`template_store`]: rows for `MsgTypeTemplate` and `MethodTemplate`.
//! - [`key_bind_store`]: rows for `KeyBind`.
//! - [`group_store`]: rows for `Group` snapshots.
//! - [`token_store`]: rows for tokens.
//! - [`strategy_store`]: [`StrategyStore`], the transactional facade over all
//!   of the above. Callers should only use this.

pub mod group_store;
pub mod key_bind_store;
pub mod schema;
pub mod strategy_store;
pub mod template_store;
pub mod token_store;

pub use strategy_store::StrategyStore;

/// A window over a listing, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return; `None` for no limit.
    pub limit: Option<usize>,
}

impl Page {
    /// Every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Rows with index in `from..to`.
    pub fn range(from: usize, to: usize) -> Self {
        Self {
            offset: from,
            limit: Some(to.saturating_sub(from)),
        }
    }

    // SQLite treats a negative LIMIT as unbounded.
    pub(crate) fn sql_limit(&self) -> i64 {
        self.limit.map(|l| l as i64).unwrap_or(-1)
    }

    pub(crate) fn sql_offset(&self) -> i64 {
        self.offset as i64
    }
}
