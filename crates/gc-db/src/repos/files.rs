//! Instrument file repository.
//!
//! Uniqueness is enforced by source path; re-ingesting the same path is a
//! no-op that returns the existing id.

use chrono::NaiveDateTime;

use gc_core::entities::{DatFile, SeisFile, TsfFile};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};
use crate::service::GravService;

fn row_to_dat_file(row: &libsql::Row) -> Result<DatFile, DatabaseError> {
    Ok(DatFile {
        id: row.get::<i64>(0)?,
        gravimeter_id: row.get::<i64>(1)?,
        station_id: row.get::<i64>(2)?,
        datetime_start: parse_datetime(&row.get::<String>(3)?)?,
        datetime_stop: parse_datetime(&row.get::<String>(4)?)?,
        path: row.get::<String>(5)?,
    })
}

fn row_to_seis_file(row: &libsql::Row) -> Result<SeisFile, DatabaseError> {
    Ok(SeisFile {
        id: row.get::<i64>(0)?,
        seismometer_id: row.get::<i64>(1)?,
        station_id: row.get::<i64>(2)?,
        datetime_start: parse_datetime(&row.get::<String>(3)?)?,
        datetime_stop: parse_datetime(&row.get::<String>(4)?)?,
        path: row.get::<String>(5)?,
    })
}

impl GravService {
    pub async fn add_dat_file(
        &self,
        gravimeter_id: i64,
        station_id: i64,
        datetime_start: NaiveDateTime,
        datetime_stop: NaiveDateTime,
        path: &str,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO dat_files
                     (gravimeter_id, station_id, datetime_start, datetime_stop, path)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(path) DO UPDATE SET path = excluded.path
                 RETURNING id",
                libsql::params![
                    gravimeter_id,
                    station_id,
                    format_datetime(datetime_start),
                    format_datetime(datetime_stop),
                    path
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn add_tsf_file(
        &self,
        dev_num_part: &str,
        datetime_start: NaiveDateTime,
        datetime_stop: NaiveDateTime,
        path: &str,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO tsf_files (dev_num_part, datetime_start, datetime_stop, path)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(path) DO UPDATE SET path = excluded.path
                 RETURNING id",
                libsql::params![
                    dev_num_part,
                    format_datetime(datetime_start),
                    format_datetime(datetime_stop),
                    path
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn add_seis_file(
        &self,
        seismometer_id: i64,
        station_id: i64,
        datetime_start: NaiveDateTime,
        datetime_stop: NaiveDateTime,
        path: &str,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO seis_files
                     (seismometer_id, station_id, datetime_start, datetime_stop, path)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(path) DO UPDATE SET path = excluded.path
                 RETURNING id",
                libsql::params![
                    seismometer_id,
                    station_id,
                    format_datetime(datetime_start),
                    format_datetime(datetime_stop),
                    path
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_dat_file(&self, id: i64) -> Result<DatFile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, gravimeter_id, station_id, datetime_start, datetime_stop, path
                 FROM dat_files WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_dat_file(&row)
    }

    /// Find a gravimetric file by its bare filename (as chain files reference
    /// them). Returns `None` when the link's file was never ingested.
    pub async fn get_dat_file_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<DatFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, gravimeter_id, station_id, datetime_start, datetime_stop, path
                 FROM dat_files WHERE path = ?1 OR path LIKE '%/' || ?1",
                [filename],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_dat_file(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_seis_file(&self, id: i64) -> Result<SeisFile, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, seismometer_id, station_id, datetime_start, datetime_stop, path
                 FROM seis_files WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_seis_file(&row)
    }

    pub async fn get_tsf_files(&self) -> Result<Vec<TsfFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, dev_num_part, datetime_start, datetime_stop, path
                 FROM tsf_files ORDER BY id",
                (),
            )
            .await?;
        let mut files = Vec::new();
        while let Some(row) = rows.next().await? {
            files.push(TsfFile {
                id: row.get::<i64>(0)?,
                dev_num_part: row.get::<String>(1)?,
                datetime_start: parse_datetime(&row.get::<String>(2)?)?,
                datetime_stop: parse_datetime(&row.get::<String>(3)?)?,
                path: row.get::<String>(4)?,
            });
        }
        Ok(files)
    }

    /// All (gravimetric, seismic) file pairs observed at the same station.
    /// The intersection resolver runs once per returned pair.
    pub async fn get_station_file_pairs(
        &self,
    ) -> Result<Vec<(DatFile, SeisFile)>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT d.id, d.gravimeter_id, d.station_id, d.datetime_start,
                        d.datetime_stop, d.path,
                        s.id, s.seismometer_id, s.station_id, s.datetime_start,
                        s.datetime_stop, s.path
                 FROM dat_files d
                 JOIN seis_files s ON s.station_id = d.station_id
                 ORDER BY d.id, s.id",
                (),
            )
            .await?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            let dat = DatFile {
                id: row.get::<i64>(0)?,
                gravimeter_id: row.get::<i64>(1)?,
                station_id: row.get::<i64>(2)?,
                datetime_start: parse_datetime(&row.get::<String>(3)?)?,
                datetime_stop: parse_datetime(&row.get::<String>(4)?)?,
                path: row.get::<String>(5)?,
            };
            let seis = SeisFile {
                id: row.get::<i64>(6)?,
                seismometer_id: row.get::<i64>(7)?,
                station_id: row.get::<i64>(8)?,
                datetime_start: parse_datetime(&row.get::<String>(9)?)?,
                datetime_stop: parse_datetime(&row.get::<String>(10)?)?,
                path: row.get::<String>(11)?,
            };
            pairs.push((dat, seis));
        }
        Ok(pairs)
    }
}
