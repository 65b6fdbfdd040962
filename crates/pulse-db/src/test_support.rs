//! Shared test utilities for pulse-db unit tests.

pub(crate) mod helpers {
    use crate::PulseDb;

    /// Open a fresh in-memory database with the schema applied.
    pub async fn test_db() -> PulseDb {
        PulseDb::open_local(":memory:").await.unwrap()
    }
}
