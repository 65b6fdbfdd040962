//! # pulse-access
//!
//! Route-level access control for the Pulse dashboard.
//!
//! - [`store`]: the storage seam (`AccessStore`) with libSQL and in-memory
//!   implementations
//! - [`roster`]: the loaded snapshot and the pure identity resolution over it
//! - [`engine`]: `AccessControl`, which owns the snapshot, reloads it after
//!   every mutation, and answers `can_access`
//! - [`context`]: the application-scoped handle consumers reach the engine through
//! - [`guard`]: navigation-time enforcement with redirect to the root route
//!
//! Authorization is fail-open by default: an identity with no roster entry,
//! or an entry without a resolvable access level, can reach every route.
//! Only a non-admin access level with an explicit whitelist restricts.

pub mod context;
pub mod engine;
pub mod error;
pub mod guard;
pub mod roster;
pub mod store;

pub use context::AccessContext;
pub use engine::{AccessControl, AccessState, Bootstrap};
pub use error::{AccessError, StoreError};
pub use guard::{AllowReason, GuardState, Navigator, RouteGuard};
pub use roster::{Resolution, Roster};
pub use store::AccessStore;
