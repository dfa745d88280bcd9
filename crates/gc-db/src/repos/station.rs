//! Station repository.
//!
//! Stations are created on first observation; coordinates are upserted when
//! a coordinate table provides them, last write wins.

use gc_core::entities::Station;

use crate::error::DatabaseError;
use crate::service::GravService;

impl GravService {
    pub async fn get_or_create_station(&self, name: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO stations (name) VALUES (?1)
                 ON CONFLICT(name) DO UPDATE SET name = excluded.name
                 RETURNING id",
                [name],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Upsert coordinates for a station, creating it if unseen.
    pub async fn set_station_coordinates(
        &self,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO stations (name, latitude, longitude) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE
                 SET latitude = excluded.latitude, longitude = excluded.longitude
                 RETURNING id",
                libsql::params![name, latitude, longitude],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_station(&self, id: i64) -> Result<Station, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, latitude, longitude FROM stations WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(Station {
            id: row.get::<i64>(0)?,
            name: row.get::<String>(1)?,
            latitude: row.get::<Option<f64>>(2)?,
            longitude: row.get::<Option<f64>>(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn coordinates_last_write_wins() {
        let svc = test_service().await;
        let id = svc.get_or_create_station("1081").await.unwrap();

        svc.set_station_coordinates("1081", 61.0, 73.4).await.unwrap();
        svc.set_station_coordinates("1081", 61.1, 73.5).await.unwrap();

        let station = svc.get_station(id).await.unwrap();
        assert_eq!(station.latitude, Some(61.1));
        assert_eq!(station.longitude, Some(73.5));
    }

    #[tokio::test]
    async fn create_without_coordinates() {
        let svc = test_service().await;
        let id = svc.get_or_create_station("5014").await.unwrap();
        let station = svc.get_station(id).await.unwrap();
        assert_eq!(station.name, "5014");
        assert!(station.latitude.is_none());
    }
}
