//! Cross-cutting error types for Pulse.
//!
//! Store-level errors (`DatabaseError`, `StoreError`) live in their own
//! crates. A unified error is deferred to `pulse-cli` where everything
//! converges into `anyhow`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A path string does not name any known dashboard route.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Data failed validation before reaching the store.
    #[error("Validation error: {0}")]
    Validation(String),
}
