//! Chain and link repository.
//!
//! Links carry an explicit `link_index`; every read orders by it, so chain
//! order never depends on insertion order.

use chrono::NaiveDate;

use gc_core::entities::{Chain, Link};

use crate::error::DatabaseError;
use crate::helpers::{DATE_FORMAT, parse_date};
use crate::service::GravService;

fn row_to_link(row: &libsql::Row) -> Result<Link, DatabaseError> {
    Ok(Link {
        id: row.get::<i64>(0)?,
        chain_id: row.get::<i64>(1)?,
        link_index: row.get::<i64>(2)?,
        filename: row.get::<String>(3)?,
        is_exist: row.get::<i64>(4)? != 0,
    })
}

impl GravService {
    pub async fn get_or_create_chain(
        &self,
        seismometer_part: &str,
        path: &str,
        date: NaiveDate,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO chains (seismometer_part, path, date) VALUES (?1, ?2, ?3)
                 ON CONFLICT(path) DO UPDATE SET path = excluded.path
                 RETURNING id",
                libsql::params![seismometer_part, path, date.format(DATE_FORMAT).to_string()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn upsert_link(
        &self,
        chain_id: i64,
        link_index: i64,
        filename: &str,
        is_exist: bool,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO links (chain_id, link_index, filename, is_exist)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(chain_id, link_index) DO UPDATE
                 SET filename = excluded.filename, is_exist = excluded.is_exist
                 RETURNING id",
                libsql::params![chain_id, link_index, filename, i64::from(is_exist)],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_chains(&self) -> Result<Vec<Chain>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, seismometer_part, path, date FROM chains ORDER BY date, id",
                (),
            )
            .await?;
        let mut chains = Vec::new();
        while let Some(row) = rows.next().await? {
            chains.push(Chain {
                id: row.get::<i64>(0)?,
                seismometer_part: row.get::<String>(1)?,
                path: row.get::<String>(2)?,
                date: parse_date(&row.get::<String>(3)?)?,
            });
        }
        Ok(chains)
    }

    /// Links of a chain in ascending `link_index` order.
    pub async fn get_links(&self, chain_id: i64) -> Result<Vec<Link>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, chain_id, link_index, filename, is_exist
                 FROM links WHERE chain_id = ?1 ORDER BY link_index",
                [chain_id],
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(&row)?);
        }
        Ok(links)
    }
}
