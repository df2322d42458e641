//! Policy model: templates, key-binds, groups, tokens, and the permit/deny
//! check run at signing time.
//!
//! The policy module provides:
//! - Message-type and method templates (immutable, copied into key-binds)
//! - Key-binds with incremental code/method edits
//! - Groups holding key-bind snapshots
//! - Token records
//! - Verification of a request against a group

pub mod group;
pub mod key_bind;
pub mod template;
pub mod token;
pub mod validate;
pub mod verify;

pub use group::Group;
pub use key_bind::KeyBind;
pub use template::{MethodTemplate, MsgTypeTemplate};
pub use token::TokenInfo;
pub use verify::{verify_group_policy, PolicyVerification};
