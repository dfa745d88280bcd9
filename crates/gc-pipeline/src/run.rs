//! Pipeline orchestration: load, process, export over one project.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use gc_config::GravConfig;
use gc_db::GravService;
use gc_db::repos::EnergyRow;
use gc_formats::{RawSeisProvider, SeismicProvider};

use crate::correction::{minute_corrections, model_for};
use crate::defect::propagate_defects;
use crate::energy::SpectralExtractor;
use crate::error::PipelineError;
use crate::export::export_corrections;
use crate::intersect::recompute_intersections;
use crate::loader::{LoadSummary, load_all};

/// Project database filename inside the export root.
pub const PROJECT_DB_NAME: &str = "project.db";

/// One project's processing pipeline: a service handle, the configuration,
/// and a seismic signal provider.
pub struct Pipeline {
    service: GravService,
    config: GravConfig,
    provider: Arc<dyn SeismicProvider>,
}

impl Pipeline {
    /// Open (or create) the project database under the export root.
    ///
    /// Fails fast on configuration errors (unknown correction model,
    /// inverted band-pass) before any processing starts.
    ///
    /// # Errors
    ///
    /// Configuration and database errors.
    pub async fn open(config: GravConfig) -> Result<Self, PipelineError> {
        config.processing.model_kind()?;
        config.processing.bandpass()?;

        std::fs::create_dir_all(&config.paths.export_root).map_err(|e| {
            PipelineError::Export {
                path: config.paths.export_root.display().to_string(),
                source: e,
            }
        })?;
        let db_path = config.paths.export_root.join(PROJECT_DB_NAME);
        let service = GravService::open_local(&db_path.to_string_lossy()).await?;

        let provider = Arc::new(RawSeisProvider::new(config.seismic.clone()));
        Ok(Self::with_provider(service, config, provider))
    }

    /// Assemble a pipeline over an explicit service and provider. Seam for
    /// tests and alternative seismic formats.
    #[must_use]
    pub fn with_provider(
        service: GravService,
        config: GravConfig,
        provider: Arc<dyn SeismicProvider>,
    ) -> Self {
        Self {
            service,
            config,
            provider,
        }
    }

    #[must_use]
    pub const fn service(&self) -> &GravService {
        &self.service
    }

    /// Ingest all configured roots into the catalog.
    ///
    /// # Errors
    ///
    /// Database errors; per-file problems are logged and skipped.
    pub async fn load(&self) -> Result<LoadSummary, PipelineError> {
        load_all(&self.service, &self.config, self.provider.as_ref()).await
    }

    /// Recompute the three derived sets and propagate defects.
    ///
    /// # Errors
    ///
    /// Database and configuration errors; per-pair failures are local.
    pub async fn process(&self) -> Result<(), PipelineError> {
        recompute_intersections(&self.service).await?;
        self.extract_energies().await?;
        self.compute_corrections().await?;
        propagate_defects(&self.service).await?;
        Ok(())
    }

    /// Write correction files for every chain and sensor pair.
    ///
    /// # Errors
    ///
    /// Database and export I/O errors.
    pub async fn export(&self) -> Result<usize, PipelineError> {
        export_corrections(&self.service, &self.config.paths.export_root).await
    }

    /// All phases in order.
    ///
    /// # Errors
    ///
    /// See [`Self::load`], [`Self::process`], [`Self::export`].
    pub async fn run(&self) -> Result<(), PipelineError> {
        self.load().await?;
        self.process().await?;
        self.export().await?;
        Ok(())
    }

    /// Recompute minute energies for every intersection.
    ///
    /// The per-intersection FFT work fans out across rayon workers, each
    /// opening its own reader; results come back to this single writer,
    /// which clears the old set and inserts the new one in one pass.
    async fn extract_energies(&self) -> Result<(), PipelineError> {
        let band = self.config.processing.bandpass()?;
        let window_seconds = self.config.processing.window_seconds;

        let mut jobs = Vec::new();
        for intersection in self.service.get_time_intersections().await? {
            let seis = self.service.get_seis_file(intersection.seis_file_id).await?;
            jobs.push((intersection, seis.path));
        }

        let provider = Arc::clone(&self.provider);
        let results = tokio::task::spawn_blocking(move || {
            jobs.into_par_iter()
                .map(|(intersection, path)| {
                    let rows = compute_one(
                        provider.as_ref(),
                        &path,
                        band,
                        window_seconds,
                        intersection.datetime_start,
                        intersection.datetime_stop,
                    );
                    (intersection.id, path, rows)
                })
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| PipelineError::Join(e.to_string()))?;

        self.service.clear_minute_energies().await?;
        let mut done = 0usize;
        for (intersection_id, path, rows) in results {
            match rows {
                Ok(rows) => {
                    self.service
                        .insert_minute_energies(intersection_id, &rows)
                        .await?;
                    done += 1;
                }
                Err(error) => {
                    warn!(intersection_id, path = %path, %error, "energy extraction failed");
                }
            }
        }
        info!(intersections = done, "energy set recomputed");
        Ok(())
    }

    /// Recompute corrections from the current energies and measures.
    async fn compute_corrections(&self) -> Result<(), PipelineError> {
        let model = model_for(self.config.processing.model_kind()?);

        self.service.clear_corrections().await?;
        let mut minutes = 0usize;
        for intersection in self.service.get_time_intersections().await? {
            let energies = self.service.get_minute_energies(intersection.id).await?;
            // Minute values are stamped at the end of their averaging window,
            // so window i pairs with the measure stamped at start + (i+1) min.
            let measures = self
                .service
                .get_measures_in_range(
                    intersection.dat_file_id,
                    intersection.datetime_start + chrono::Duration::minutes(1),
                    intersection.datetime_stop + chrono::Duration::minutes(1),
                )
                .await?;

            let measured: Vec<f64> = measures.iter().map(|m| m.grav_value).collect();
            let energy_full: Vec<f64> = energies.iter().map(|e| e.energy_full).collect();

            let corrections: Vec<(i64, f64)> = minute_corrections(
                model.as_ref(),
                &measured,
                &energy_full,
            )
            .into_iter()
            .map(|(position, value)| (energies[position].minute_index, value))
            .collect();

            minutes += corrections.len();
            self.service
                .insert_corrections(intersection.id, &corrections)
                .await?;
        }
        info!(minutes, model = model.kind().as_str(), "correction set recomputed");
        Ok(())
    }
}

fn compute_one(
    provider: &dyn SeismicProvider,
    path: &str,
    band: (f64, f64),
    window_seconds: u32,
    start: chrono::NaiveDateTime,
    stop: chrono::NaiveDateTime,
) -> Result<Vec<EnergyRow>, PipelineError> {
    let reader = provider.open(Path::new(path))?;
    let mut extractor = SpectralExtractor::new(band, window_seconds);
    extractor.window_energies(reader.as_ref(), start, stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;
    use std::fmt::Write as _;
    use std::path::PathBuf;

    use gc_core::CorrectionModelKind;

    /// Write a raw 3-channel seismic file whose X/Y/Z carry a 2 Hz tone with
    /// per-minute amplitude steps, so each minute has a distinct energy.
    fn write_raw_tone(dir: &Path, name: &str, minutes: u32, rate: u32) -> PathBuf {
        let mut bytes = Vec::new();
        for minute in 0..minutes {
            let amplitude = f64::from(1000 * (minute + 1));
            for i in 0..(rate * 60) {
                let phase = TAU * 2.0 * f64::from(i) / f64::from(rate);
                #[allow(clippy::cast_possible_truncation)]
                let sample = (amplitude * phase.sin()) as i32;
                for _channel in 0..3 {
                    bytes.extend_from_slice(&sample.to_le_bytes());
                }
            }
        }
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn write_dat(dir: &Path, name: &str, first_minute: &str, count: usize) {
        let mut body = String::new();
        body.push_str("/\t\tCG-6 Survey\n");
        body.push_str("/\tSurvey Name:\tS1081\n");
        body.push_str("/\tInstrument Serial Number:\tCG6-220541418\n");
        for _ in 3..21 {
            body.push_str("/\theader\n");
        }
        let (h, m): (u32, u32) = {
            let mut parts = first_minute.split(':');
            (
                parts.next().unwrap().parse().unwrap(),
                parts.next().unwrap().parse().unwrap(),
            )
        };
        for i in 0..count {
            let minute = m + u32::try_from(i).unwrap();
            writeln!(
                body,
                "1081\t2021-09-06\t{h:02}:{minute:02}:00\t{}",
                2567.0 - 0.01 * i as f64
            )
            .unwrap();
        }
        std::fs::write(dir.join(name), body).unwrap();
    }

    async fn fixture_pipeline(dir: &Path, model: CorrectionModelKind) -> Pipeline {
        let grav = dir.join("grav");
        let seis = dir.join("seis");
        let export = dir.join("export");
        std::fs::create_dir_all(&grav).unwrap();
        std::fs::create_dir_all(&seis).unwrap();

        // Grav minutes stamped 03:01..=03:04 cover [03:00, 03:04); the seismic
        // record starts at 03:00:00 and runs 4 minutes.
        write_dat(&grav, "1418_1081_12.dat", "03:01", 4);
        std::fs::write(grav.join("chain_K07_2021-09-06.txt"), "1418_1081_12.dat\n").unwrap();
        write_raw_tone(&seis, "12_1081_K07_2021-09-06_03-00-00.xx", 4, 50);

        let mut config = GravConfig::default();
        config.paths.gravimetric_root = grav;
        config.paths.seismic_root = seis;
        config.paths.export_root = export;
        config.seismic.sample_rate = 50;
        config.processing.f_min = 0.5;
        config.processing.f_max = 5.0;
        config.processing.correction_model = model.as_str().to_string();

        Pipeline::open(config).await.unwrap()
    }

    #[tokio::test]
    async fn full_run_produces_energies_corrections_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = fixture_pipeline(dir.path(), CorrectionModelKind::SeismicEnergy).await;

        pipeline.run().await.unwrap();
        let svc = pipeline.service();

        let intersections = svc.get_time_intersections().await.unwrap();
        assert_eq!(intersections.len(), 1);

        let energies = svc.get_minute_energies(intersections[0].id).await.unwrap();
        assert_eq!(energies.len(), 4);
        // Amplitude steps up each minute, so does the energy.
        assert!(energies.windows(2).all(|w| w[0].energy_full < w[1].energy_full));

        let corrections = svc.get_corrections(intersections[0].id).await.unwrap();
        assert_eq!(corrections.len(), 4);
        // Minute 0 is the quiet one.
        assert_eq!(corrections[0].value, 0.0);

        let export_file = dir
            .path()
            .join("export")
            .join("1418-K07")
            .join("2021_09_06")
            .join("1418")
            .join("cycles_K07_2021-09-06.txt");
        let content = std::fs::read_to_string(export_file).unwrap();
        assert!(content.starts_with("seans\tcycle\tzabrak\tpopravka\n"));
        assert_eq!(content.lines().count(), 5);
    }

    #[tokio::test]
    async fn reprocessing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = fixture_pipeline(dir.path(), CorrectionModelKind::LevelClamped).await;

        pipeline.load().await.unwrap();
        pipeline.process().await.unwrap();
        let svc = pipeline.service();

        let first_id = svc.get_time_intersections().await.unwrap()[0].id;
        let first: Vec<_> = svc
            .get_corrections(first_id)
            .await
            .unwrap()
            .iter()
            .map(|c| (c.minute_index, c.value))
            .collect();

        pipeline.process().await.unwrap();
        let second_id = svc.get_time_intersections().await.unwrap()[0].id;
        let second: Vec<_> = svc
            .get_corrections(second_id)
            .await
            .unwrap()
            .iter()
            .map(|c| (c.minute_index, c.value))
            .collect();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn bad_model_name_fails_before_processing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GravConfig::default();
        config.paths.export_root = dir.path().to_path_buf();
        config.processing.correction_model = "regression".to_string();

        assert!(matches!(
            Pipeline::open(config).await,
            Err(PipelineError::Config(_))
        ));
    }
}
