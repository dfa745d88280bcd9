//! Minute measure repository.

use chrono::NaiveDateTime;

use gc_core::entities::MinuteMeasure;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};
use crate::service::GravService;

fn row_to_measure(row: &libsql::Row) -> Result<MinuteMeasure, DatabaseError> {
    Ok(MinuteMeasure {
        id: row.get::<i64>(0)?,
        dat_file_id: row.get::<i64>(1)?,
        datetime_val: parse_datetime(&row.get::<String>(2)?)?,
        grav_value: row.get::<f64>(3)?,
        is_bad: row.get::<i64>(4)? != 0,
    })
}

impl GravService {
    /// Bulk insert minute values for a gravimetric file.
    ///
    /// Duplicate (file, timestamp) rows are ignored, so re-ingesting a file
    /// does not duplicate its measures.
    pub async fn insert_minute_measures(
        &self,
        dat_file_id: i64,
        measures: &[(NaiveDateTime, f64)],
    ) -> Result<(), DatabaseError> {
        for (datetime_val, value) in measures {
            self.db()
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO minute_measures
                         (dat_file_id, datetime_val, grav_value)
                     VALUES (?1, ?2, ?3)",
                    libsql::params![dat_file_id, format_datetime(*datetime_val), *value],
                )
                .await?;
        }
        Ok(())
    }

    /// All measures of a file, ordered by timestamp. Row position doubles as
    /// the cycle index within the file's link.
    pub async fn get_measures(&self, dat_file_id: i64) -> Result<Vec<MinuteMeasure>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, dat_file_id, datetime_val, grav_value, is_bad
                 FROM minute_measures WHERE dat_file_id = ?1
                 ORDER BY datetime_val",
                [dat_file_id],
            )
            .await?;
        let mut measures = Vec::new();
        while let Some(row) = rows.next().await? {
            measures.push(row_to_measure(&row)?);
        }
        Ok(measures)
    }

    /// Measures of a file inside `[start, stop)`, ordered by timestamp.
    pub async fn get_measures_in_range(
        &self,
        dat_file_id: i64,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Vec<MinuteMeasure>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, dat_file_id, datetime_val, grav_value, is_bad
                 FROM minute_measures
                 WHERE dat_file_id = ?1 AND datetime_val >= ?2 AND datetime_val < ?3
                 ORDER BY datetime_val",
                libsql::params![dat_file_id, format_datetime(start), format_datetime(stop)],
            )
            .await?;
        let mut measures = Vec::new();
        while let Some(row) = rows.next().await? {
            measures.push(row_to_measure(&row)?);
        }
        Ok(measures)
    }

    /// Set the defect flag on the `offset`-th measure (by timestamp order) of
    /// a file. Offsets past the end are silently ignored: a cycle marker with
    /// no corresponding minute keeps the default.
    pub async fn set_measure_defect_by_offset(
        &self,
        dat_file_id: i64,
        offset: i64,
        is_bad: bool,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE minute_measures SET is_bad = ?1
                 WHERE id IN (
                     SELECT id FROM minute_measures WHERE dat_file_id = ?2
                     ORDER BY datetime_val LIMIT 1 OFFSET ?3
                 )",
                libsql::params![i64::from(is_bad), dat_file_id, offset],
            )
            .await?;
        Ok(())
    }
}
