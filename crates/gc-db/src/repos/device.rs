//! Gravimeter and seismometer repository.
//!
//! Devices are created on first observation and immutable thereafter;
//! `get_or_create_*` is a single atomic upsert returning the surrogate id.

use gc_core::entities::{Gravimeter, Seismometer};

use crate::error::DatabaseError;
use crate::service::GravService;

impl GravService {
    pub async fn get_or_create_gravimeter(&self, number: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO gravimeters (number) VALUES (?1)
                 ON CONFLICT(number) DO UPDATE SET number = excluded.number
                 RETURNING id",
                [number],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_gravimeter(&self, id: i64) -> Result<Gravimeter, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, number FROM gravimeters WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(Gravimeter {
            id: row.get::<i64>(0)?,
            number: row.get::<String>(1)?,
        })
    }

    pub async fn get_or_create_seismometer(&self, number: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO seismometers (number) VALUES (?1)
                 ON CONFLICT(number) DO UPDATE SET number = excluded.number
                 RETURNING id",
                [number],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_seismometer(&self, id: i64) -> Result<Seismometer, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT id, number FROM seismometers WHERE id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(Seismometer {
            id: row.get::<i64>(0)?,
            number: row.get::<String>(1)?,
        })
    }
}
