//! # gc-db
//!
//! libSQL persistence facade for Gravicorr project state.
//!
//! Handles all relational state: devices, stations, instrument files, chains
//! and links, minute measures, and the three fully derived sets (time
//! intersections, minute energies, corrections) that are cleared and rebuilt
//! every processing run.
//!
//! All queries are parameterized; values are never interpolated into query
//! text. Natural-key upserts use `INSERT ... ON CONFLICT ... RETURNING id`
//! so get-or-create is a single atomic statement.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

pub use service::GravService;

/// Central database handle for all Gravicorr state operations.
pub struct GravDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl GravDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let grav_db = Self { db, conn };
        grav_db.run_migrations().await?;
        Ok(grav_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
