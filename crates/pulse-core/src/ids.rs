//! ID prefixes for generated entity identifiers.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by the store.

pub const PREFIX_ACCESS_LEVEL: &str = "acl";
pub const PREFIX_ORG_USER: &str = "usr";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_ACCESS_LEVEL, PREFIX_ORG_USER];
