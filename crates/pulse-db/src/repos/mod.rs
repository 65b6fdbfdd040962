//! Repository modules implementing CRUD operations for roster entities.
//!
//! Each module adds methods to `PulseDb` via `impl PulseDb` blocks.

pub mod access_level;
pub mod org_user;
