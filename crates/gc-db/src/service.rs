//! Service layer: all repo methods are implemented as `impl GravService`.
//!
//! The service is the single writer for the three recomputed sets; callers
//! performing a "clear + insert all" phase funnel every write through one
//! service instance so partial interleavings are never observable across
//! runs.

use crate::GravDb;
use crate::error::DatabaseError;

/// Facade over [`GravDb`] hosting all repository methods.
pub struct GravService {
    db: GravDb,
}

impl GravService {
    /// Open a service over a local database file (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = GravDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Wrap an existing database handle.
    #[must_use]
    pub const fn from_db(db: GravDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &GravDb {
        &self.db
    }
}
