use pulse_db::error::DatabaseError;
use thiserror::Error;

/// Any failure reported by the data-store adapter.
///
/// Transient and permanent failures are not distinguished; nothing in the
/// access layer retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("rejected by store: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Validation(e) => Self::Rejected(e.to_string()),
            DatabaseError::NoResult => Self::Rejected("no result returned".into()),
            DatabaseError::LibSql(e) if e.to_string().contains("constraint failed") => {
                Self::Rejected(e.to_string())
            }
            other @ (DatabaseError::Query(_)
            | DatabaseError::Migration(_)
            | DatabaseError::LibSql(_)) => Self::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    /// A mutation failed in the store. The loaded roster is unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// `AccessContext::current` was called outside `AccessContext::scope`.
    #[error("access context requested outside of an AccessContext scope")]
    MissingProvider,
}
