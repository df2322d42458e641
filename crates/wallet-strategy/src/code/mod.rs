//! Message-type codes: registry of names and aggregate markers, and the
//! resolver that flattens aggregates into leaf codes.

pub mod registry;
pub mod resolve;

pub use registry::{CodeRegistry, CodeRegistryBuilder, AGGREGATE_BASE};
pub use resolve::{is_resolved, resolve};
