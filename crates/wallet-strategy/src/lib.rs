//! WalletStrategy: signing-policy store for a wallet service.
//!
//! Named message-type and method templates, per-address key-binds,
//! frozen groups of key-binds, and opaque tokens that resolve to a group.
//! All state is persisted in SQLite and every operation is one transaction.

pub mod address;
pub mod code;
pub mod config;
pub mod crypto;
pub mod error;
pub mod policy;
pub mod set;
pub mod storage;
pub mod time;

// Re-export primary types
pub use address::{Address, Network};
pub use code::{CodeRegistry, CodeRegistryBuilder, AGGREGATE_BASE};
pub use config::StoreConfig;
pub use error::{Result, StrategyError};
pub use set::{CodeSet, MethodSet, OrderedSet};

// Re-export policy types
pub use policy::{
    verify_group_policy, Group, KeyBind, MethodTemplate, MsgTypeTemplate, PolicyVerification,
    TokenInfo,
};

// Re-export storage types
pub use storage::{Page, StrategyStore};
