//! # pulse-core
//!
//! Core types shared across all Pulse crates:
//! - Entity structs for the access-control roster (access levels, org users)
//! - The closed catalogue of dashboard routes
//! - Authenticated identity as handed over by the auth provider
//! - ID prefix constants
//! - Cross-cutting error types

pub mod entities;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod routes;

pub use routes::Route;
