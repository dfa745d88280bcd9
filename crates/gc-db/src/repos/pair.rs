//! Sensor pair and post-review correction repository.
//!
//! A sensor pair row for (chain, link, gravimeter, seismometer) marks that
//! link as having reviewed corrections; its `post_corrections` rows are what
//! the export aggregator emits for that link.

use gc_core::entities::{PostCorrection, SensorPair};

use crate::error::DatabaseError;
use crate::service::GravService;

impl GravService {
    pub async fn add_sensor_pair(
        &self,
        chain_id: i64,
        link_id: i64,
        gravimeter_id: i64,
        seismometer_id: i64,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO sensor_pairs (chain_id, link_id, gravimeter_id, seismometer_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(chain_id, link_id, gravimeter_id, seismometer_id)
                 DO UPDATE SET link_id = excluded.link_id
                 RETURNING id",
                libsql::params![chain_id, link_id, gravimeter_id, seismometer_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Look up the pair for one link; `None` means no reviewed corrections
    /// exist and export falls back to raw defect flags.
    pub async fn get_sensor_pair(
        &self,
        chain_id: i64,
        link_id: i64,
        gravimeter_id: i64,
        seismometer_id: i64,
    ) -> Result<Option<SensorPair>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, chain_id, link_id, gravimeter_id, seismometer_id
                 FROM sensor_pairs
                 WHERE chain_id = ?1 AND link_id = ?2
                   AND gravimeter_id = ?3 AND seismometer_id = ?4",
                libsql::params![chain_id, link_id, gravimeter_id, seismometer_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(SensorPair {
                id: row.get::<i64>(0)?,
                chain_id: row.get::<i64>(1)?,
                link_id: row.get::<i64>(2)?,
                gravimeter_id: row.get::<i64>(3)?,
                seismometer_id: row.get::<i64>(4)?,
            })),
            None => Ok(None),
        }
    }

    /// Distinct (gravimeter, seismometer) combinations observed anywhere in a
    /// chain, in stable order.
    pub async fn get_chain_device_pairs(
        &self,
        chain_id: i64,
    ) -> Result<Vec<(i64, i64)>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT gravimeter_id, seismometer_id
                 FROM sensor_pairs WHERE chain_id = ?1
                 ORDER BY gravimeter_id, seismometer_id",
                [chain_id],
            )
            .await?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            pairs.push((row.get::<i64>(0)?, row.get::<i64>(1)?));
        }
        Ok(pairs)
    }

    pub async fn insert_post_corrections(
        &self,
        sensor_pair_id: i64,
        rows_in: &[(i64, bool, f64)],
    ) -> Result<(), DatabaseError> {
        for (cycle_index, is_bad, value) in rows_in {
            self.db()
                .conn()
                .execute(
                    "INSERT OR REPLACE INTO post_corrections
                         (sensor_pair_id, cycle_index, is_bad, value)
                     VALUES (?1, ?2, ?3, ?4)",
                    libsql::params![sensor_pair_id, *cycle_index, i64::from(*is_bad), *value],
                )
                .await?;
        }
        Ok(())
    }

    /// Reviewed corrections for one pair, ordered by cycle index.
    pub async fn get_post_corrections(
        &self,
        sensor_pair_id: i64,
    ) -> Result<Vec<PostCorrection>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, sensor_pair_id, cycle_index, is_bad, value
                 FROM post_corrections WHERE sensor_pair_id = ?1
                 ORDER BY cycle_index",
                [sensor_pair_id],
            )
            .await?;
        let mut corrections = Vec::new();
        while let Some(row) = rows.next().await? {
            corrections.push(PostCorrection {
                id: row.get::<i64>(0)?,
                sensor_pair_id: row.get::<i64>(1)?,
                cycle_index: row.get::<i64>(2)?,
                is_bad: row.get::<i64>(3)? != 0,
                value: row.get::<f64>(4)?,
            });
        }
        Ok(corrections)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::test_support::helpers::test_service;

    async fn fixture_link(svc: &crate::GravService) -> (i64, i64, i64, i64) {
        let grav = svc.get_or_create_gravimeter("g1").await.unwrap();
        let seis = svc.get_or_create_seismometer("K07").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2021, 9, 6).unwrap();
        let chain = svc
            .get_or_create_chain("K07", "/chains/chain_K07.txt", date)
            .await
            .unwrap();
        let link = svc.upsert_link(chain, 0, "a.dat", true).await.unwrap();
        (chain, link, grav, seis)
    }

    #[tokio::test]
    async fn missing_pair_means_no_review() {
        let svc = test_service().await;
        let (chain, link, grav, seis) = fixture_link(&svc).await;

        assert!(
            svc.get_sensor_pair(chain, link, grav, seis)
                .await
                .unwrap()
                .is_none()
        );

        svc.add_sensor_pair(chain, link, grav, seis).await.unwrap();
        assert!(
            svc.get_sensor_pair(chain, link, grav, seis)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn post_corrections_ordered_by_cycle() {
        let svc = test_service().await;
        let (chain, link, grav, seis) = fixture_link(&svc).await;
        let pair = svc.add_sensor_pair(chain, link, grav, seis).await.unwrap();

        svc.insert_post_corrections(pair, &[(2, false, 0.003), (0, true, 0.0), (1, false, -0.001)])
            .await
            .unwrap();

        let rows = svc.get_post_corrections(pair).await.unwrap();
        let cycles: Vec<_> = rows.iter().map(|r| r.cycle_index).collect();
        assert_eq!(cycles, vec![0, 1, 2]);
        assert!(rows[0].is_bad);
    }

    #[tokio::test]
    async fn distinct_device_pairs_per_chain() {
        let svc = test_service().await;
        let (chain, link, grav, seis) = fixture_link(&svc).await;
        let link2 = svc.upsert_link(chain, 1, "b.dat", true).await.unwrap();

        svc.add_sensor_pair(chain, link, grav, seis).await.unwrap();
        svc.add_sensor_pair(chain, link2, grav, seis).await.unwrap();

        let pairs = svc.get_chain_device_pairs(chain).await.unwrap();
        assert_eq!(pairs, vec![(grav, seis)]);
    }
}
