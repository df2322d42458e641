//! Templates: named, reusable code and method sets used to seed key-binds.
//!
//! Templates are immutable once created. A key-bind built from a template
//! receives a copy of its contents; deleting or recreating the template
//! never reaches into existing key-binds.

use serde::{Deserialize, Serialize};

use crate::set::{CodeSet, MethodSet};

/// A named set of message-type codes. Codes are stored as given and may
/// include aggregate markers; they are resolved when copied into a key-bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTypeTemplate {
    pub name: String,
    pub codes: CodeSet,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: i64,
}

/// A named set of method names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTemplate {
    pub name: String,
    pub methods: MethodSet,
    /// Creation timestamp (microseconds since epoch).
    pub created_at: i64,
}
