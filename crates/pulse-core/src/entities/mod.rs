//! Entity structs for the access-control roster.
//!
//! Each entity maps to a table in the libSQL database (see
//! `pulse-db/migrations`). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema`.

mod access_level;
mod org_user;

pub use access_level::{AccessLevel, NewAccessLevel};
pub use org_user::{NewOrgUser, OrgUser};
