//! Repository for the three fully derived sets: time intersections, minute
//! energies, and corrections.
//!
//! Each set is consumed only after a full "clear all, insert all" phase;
//! nothing here patches rows in place.

use chrono::NaiveDateTime;

use gc_core::entities::{Correction, MinuteEnergy, TimeIntersection};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_datetime};
use crate::service::GravService;

/// One computed energy window, ready for bulk insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRow {
    pub minute_index: i64,
    pub energy_x: f64,
    pub energy_y: f64,
    pub energy_z: f64,
    pub energy_full: f64,
}

impl GravService {
    // -- time intersections -------------------------------------------------

    /// Delete every intersection (cascades to energies and corrections).
    pub async fn clear_time_intersections(&self) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM time_intersections", ())
            .await?;
        Ok(())
    }

    pub async fn insert_time_intersection(
        &self,
        dat_file_id: i64,
        seis_file_id: i64,
        datetime_start: NaiveDateTime,
        datetime_stop: NaiveDateTime,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO time_intersections
                     (dat_file_id, seis_file_id, datetime_start, datetime_stop)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id",
                libsql::params![
                    dat_file_id,
                    seis_file_id,
                    format_datetime(datetime_start),
                    format_datetime(datetime_stop)
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    pub async fn get_time_intersections(&self) -> Result<Vec<TimeIntersection>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, dat_file_id, seis_file_id, datetime_start, datetime_stop
                 FROM time_intersections ORDER BY id",
                (),
            )
            .await?;
        let mut intersections = Vec::new();
        while let Some(row) = rows.next().await? {
            intersections.push(TimeIntersection {
                id: row.get::<i64>(0)?,
                dat_file_id: row.get::<i64>(1)?,
                seis_file_id: row.get::<i64>(2)?,
                datetime_start: parse_datetime(&row.get::<String>(3)?)?,
                datetime_stop: parse_datetime(&row.get::<String>(4)?)?,
            });
        }
        Ok(intersections)
    }

    // -- minute energies ----------------------------------------------------

    pub async fn clear_minute_energies(&self) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM minute_energies", ())
            .await?;
        Ok(())
    }

    pub async fn insert_minute_energies(
        &self,
        intersection_id: i64,
        energies: &[EnergyRow],
    ) -> Result<(), DatabaseError> {
        for e in energies {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO minute_energies
                         (intersection_id, minute_index, energy_x, energy_y, energy_z, energy_full)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    libsql::params![
                        intersection_id,
                        e.minute_index,
                        e.energy_x,
                        e.energy_y,
                        e.energy_z,
                        e.energy_full
                    ],
                )
                .await?;
        }
        Ok(())
    }

    /// Energies of one intersection, ordered by minute index.
    pub async fn get_minute_energies(
        &self,
        intersection_id: i64,
    ) -> Result<Vec<MinuteEnergy>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, intersection_id, minute_index,
                        energy_x, energy_y, energy_z, energy_full
                 FROM minute_energies WHERE intersection_id = ?1
                 ORDER BY minute_index",
                [intersection_id],
            )
            .await?;
        let mut energies = Vec::new();
        while let Some(row) = rows.next().await? {
            energies.push(MinuteEnergy {
                id: row.get::<i64>(0)?,
                intersection_id: row.get::<i64>(1)?,
                minute_index: row.get::<i64>(2)?,
                energy_x: row.get::<f64>(3)?,
                energy_y: row.get::<f64>(4)?,
                energy_z: row.get::<f64>(5)?,
                energy_full: row.get::<f64>(6)?,
            });
        }
        Ok(energies)
    }

    // -- corrections --------------------------------------------------------

    pub async fn clear_corrections(&self) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM corrections", ())
            .await?;
        Ok(())
    }

    pub async fn insert_corrections(
        &self,
        intersection_id: i64,
        corrections: &[(i64, f64)],
    ) -> Result<(), DatabaseError> {
        for (minute_index, value) in corrections {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO corrections (intersection_id, minute_index, value)
                     VALUES (?1, ?2, ?3)",
                    libsql::params![intersection_id, *minute_index, *value],
                )
                .await?;
        }
        Ok(())
    }

    /// Corrections of one intersection, ordered by minute index.
    pub async fn get_corrections(
        &self,
        intersection_id: i64,
    ) -> Result<Vec<Correction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, intersection_id, minute_index, value
                 FROM corrections WHERE intersection_id = ?1
                 ORDER BY minute_index",
                [intersection_id],
            )
            .await?;
        let mut corrections = Vec::new();
        while let Some(row) = rows.next().await? {
            corrections.push(Correction {
                id: row.get::<i64>(0)?,
                intersection_id: row.get::<i64>(1)?,
                minute_index: row.get::<i64>(2)?,
                value: row.get::<f64>(3)?,
            });
        }
        Ok(corrections)
    }
}

#[cfg(test)]
mod tests {
    use super::EnergyRow;
    use crate::test_support::helpers::{dt, test_service};

    async fn fixture_intersection(svc: &crate::GravService) -> i64 {
        let grav = svc.get_or_create_gravimeter("g1").await.unwrap();
        let seis = svc.get_or_create_seismometer("K07").await.unwrap();
        let station = svc.get_or_create_station("1081").await.unwrap();
        let dat = svc
            .add_dat_file(
                grav,
                station,
                dt(2021, 9, 6, 3, 0, 0),
                dt(2021, 9, 6, 4, 0, 0),
                "/d/a.dat",
            )
            .await
            .unwrap();
        let sf = svc
            .add_seis_file(
                seis,
                station,
                dt(2021, 9, 6, 2, 0, 0),
                dt(2021, 9, 6, 5, 0, 0),
                "/s/a.xx",
            )
            .await
            .unwrap();
        svc.insert_time_intersection(dat, sf, dt(2021, 9, 6, 3, 0, 0), dt(2021, 9, 6, 4, 0, 0))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn clear_cascades_to_dependents() {
        let svc = test_service().await;
        let id = fixture_intersection(&svc).await;

        svc.insert_minute_energies(
            id,
            &[EnergyRow {
                minute_index: 0,
                energy_x: 1.0,
                energy_y: 2.0,
                energy_z: 3.0,
                energy_full: 3.741_657,
            }],
        )
        .await
        .unwrap();
        svc.insert_corrections(id, &[(0, -0.0042)]).await.unwrap();

        svc.clear_time_intersections().await.unwrap();

        assert!(svc.get_time_intersections().await.unwrap().is_empty());
        assert!(svc.get_minute_energies(id).await.unwrap().is_empty());
        assert!(svc.get_corrections(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn energies_ordered_by_minute_index() {
        let svc = test_service().await;
        let id = fixture_intersection(&svc).await;

        let rows: Vec<_> = [2, 0, 1]
            .into_iter()
            .map(|i| EnergyRow {
                minute_index: i,
                energy_x: i as f64,
                energy_y: 0.0,
                energy_z: 0.0,
                energy_full: i as f64,
            })
            .collect();
        svc.insert_minute_energies(id, &rows).await.unwrap();

        let back = svc.get_minute_energies(id).await.unwrap();
        let indexes: Vec<_> = back.iter().map(|e| e.minute_index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn corrections_round_trip() {
        let svc = test_service().await;
        let id = fixture_intersection(&svc).await;

        svc.insert_corrections(id, &[(0, -0.0042), (1, 0.0)])
            .await
            .unwrap();
        let back = svc.get_corrections(id).await.unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0].value, -0.0042);
    }
}
