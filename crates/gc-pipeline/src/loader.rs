//! File catalog loader.
//!
//! Walks the gravimetric root for `.dat`, `.tsf`, and chain files, the
//! seismic root for configured record extensions, and the optional station
//! coordinate table. Every per-file failure is local: wrong-format files
//! are ignored quietly, malformed ones logged, and the walk continues.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use gc_config::GravConfig;
use gc_db::GravService;
use gc_formats::{
    CHAIN_EXTENSION, ChainRecord, CoordinateColumns, DAT_EXTENSION, DatRecord, FormatError,
    SeismicProvider, TSF_EXTENSION, TsfRecord, parse_coordinates, parse_seis_filename,
};

use crate::error::PipelineError;

/// Counts of everything one load pass ingested.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub dat_files: usize,
    pub tsf_files: usize,
    pub seis_files: usize,
    pub chains: usize,
    pub coordinates: usize,
}

/// Recursively collect regular files under `root`, unreadable directories
/// logged and skipped.
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %dir.display(), %error, "directory skipped");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

fn log_skip(path: &Path, error: &FormatError) {
    match error {
        // Not this format at all: expected during a mixed-directory walk.
        FormatError::WrongFormat { .. } => debug!(path = %path.display(), %error, "not ingested"),
        _ => warn!(path = %path.display(), %error, "file skipped"),
    }
}

/// Ingest everything the configured roots contain.
pub async fn load_all(
    service: &GravService,
    config: &GravConfig,
    provider: &dyn SeismicProvider,
) -> Result<LoadSummary, PipelineError> {
    let mut summary = LoadSummary::default();

    let grav_files = walk_files(&config.paths.gravimetric_root);

    // Instrument files first so chain links can resolve them.
    for path in &grav_files {
        match path.extension().and_then(|e| e.to_str()) {
            Some(DAT_EXTENSION) => match DatRecord::open(path) {
                Ok(record) => {
                    ingest_dat(service, &record).await?;
                    summary.dat_files += 1;
                }
                Err(error) => log_skip(path, &error),
            },
            Some(TSF_EXTENSION) => match TsfRecord::open(path) {
                Ok(record) => {
                    service
                        .add_tsf_file(
                            &record.dev_num_part,
                            record.datetime_start,
                            record.datetime_stop,
                            &record.path.to_string_lossy(),
                        )
                        .await?;
                    summary.tsf_files += 1;
                }
                Err(error) => log_skip(path, &error),
            },
            _ => {}
        }
    }

    for path in &grav_files {
        if path.extension().and_then(|e| e.to_str()) != Some(CHAIN_EXTENSION) {
            continue;
        }
        match ChainRecord::open(path) {
            Ok(record) => {
                ingest_chain(service, &record).await?;
                summary.chains += 1;
            }
            Err(error) => log_skip(path, &error),
        }
    }

    for path in walk_files(&config.paths.seismic_root) {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !config.seismic.is_seismic_file(filename) {
            continue;
        }
        match ingest_seis(service, config, provider, &path, filename).await {
            Ok(()) => summary.seis_files += 1,
            Err(PipelineError::Format(error)) => log_skip(&path, &error),
            Err(error) => return Err(error),
        }
    }

    if let Some(table) = &config.paths.coordinates {
        match parse_coordinates(table, CoordinateColumns::default()) {
            Ok(coords) => {
                for coord in coords {
                    service
                        .set_station_coordinates(&coord.station, coord.x_wgs84, coord.y_wgs84)
                        .await?;
                    summary.coordinates += 1;
                }
            }
            Err(error) => warn!(path = %table.display(), %error, "coordinate table skipped"),
        }
    }

    info!(
        dat = summary.dat_files,
        tsf = summary.tsf_files,
        seis = summary.seis_files,
        chains = summary.chains,
        coordinates = summary.coordinates,
        "load finished"
    );
    Ok(summary)
}

async fn ingest_dat(service: &GravService, record: &DatRecord) -> Result<(), PipelineError> {
    let gravimeter_id = service.get_or_create_gravimeter(&record.device_number).await?;
    let station_id = service.get_or_create_station(&record.station).await?;
    let dat_file_id = service
        .add_dat_file(
            gravimeter_id,
            station_id,
            record.datetime_start,
            record.datetime_stop,
            &record.path.to_string_lossy(),
        )
        .await?;
    service
        .insert_minute_measures(dat_file_id, &record.measures)
        .await?;
    Ok(())
}

async fn ingest_chain(service: &GravService, record: &ChainRecord) -> Result<(), PipelineError> {
    let chain_id = service
        .get_or_create_chain(
            &record.sensor_part,
            &record.path.to_string_lossy(),
            record.date,
        )
        .await?;
    for (link_index, filename) in &record.links {
        let is_exist = service.get_dat_file_by_filename(filename).await?.is_some();
        service
            .upsert_link(chain_id, *link_index, filename, is_exist)
            .await?;
    }
    Ok(())
}

async fn ingest_seis(
    service: &GravService,
    config: &GravConfig,
    provider: &dyn SeismicProvider,
    path: &Path,
    filename: &str,
) -> Result<(), PipelineError> {
    let attrs = parse_seis_filename(filename, &config.seismic)?;
    let reader = provider.open(path)?;

    let seismometer_id = service.get_or_create_seismometer(&attrs.sensor).await?;
    let station_id = service.get_or_create_station(&attrs.point).await?;
    service
        .add_seis_file(
            seismometer_id,
            station_id,
            reader.datetime_start(),
            reader.datetime_stop(),
            &path.to_string_lossy(),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    use gc_formats::RawSeisProvider;

    fn write_dat(dir: &Path, name: &str, times: &[&str]) {
        let mut body = String::new();
        body.push_str("/\t\tCG-6 Survey\n");
        body.push_str("/\tSurvey Name:\tS1081\n");
        body.push_str("/\tInstrument Serial Number:\tCG6-220541418\n");
        for _ in 3..21 {
            body.push_str("/\theader\n");
        }
        for (i, time) in times.iter().enumerate() {
            writeln!(body, "1081\t2021-09-06\t{time}\t{}", 2567.0 + i as f64).unwrap();
        }
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn write_raw_seis(dir: &Path, name: &str, frames: u32) {
        let mut bytes = Vec::new();
        for frame in 0..frames {
            for channel in 0..3i32 {
                #[allow(clippy::cast_possible_wrap)]
                bytes.extend_from_slice(&(frame as i32 + channel).to_le_bytes());
            }
        }
        std::fs::write(dir.join(name), bytes).unwrap();
    }

    fn test_config(grav: &Path, seis: &Path, export: &Path) -> GravConfig {
        let mut config = GravConfig::default();
        config.paths.gravimetric_root = grav.to_path_buf();
        config.paths.seismic_root = seis.to_path_buf();
        config.paths.export_root = export.to_path_buf();
        config
    }

    #[tokio::test]
    async fn mixed_walk_ingests_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let grav = dir.path().join("grav");
        let seis = dir.path().join("seis");
        std::fs::create_dir_all(grav.join("nested")).unwrap();
        std::fs::create_dir_all(&seis).unwrap();

        write_dat(&grav, "1418_1081_12.dat", &["03:10:00", "03:11:00"]);
        write_dat(
            &grav.join("nested"),
            "1418_1081_13.dat",
            &["04:10:00", "04:11:00"],
        );
        std::fs::write(
            grav.join("chain_K07_2021-09-06.txt"),
            "1418_1081_12.dat\nmissing.dat\n",
        )
        .unwrap();
        std::fs::write(grav.join("notes.log"), "ignore me\n").unwrap();
        write_raw_seis(&seis, "12_1081_K07_2021-09-06_03-00-00.xx", 300);

        let config = test_config(&grav, &seis, dir.path());
        let provider = RawSeisProvider::new(config.seismic.clone());
        let svc = GravService::open_local(":memory:").await.unwrap();

        let summary = load_all(&svc, &config, &provider).await.unwrap();
        assert_eq!(summary.dat_files, 2);
        assert_eq!(summary.seis_files, 1);
        assert_eq!(summary.chains, 1);

        let chains = svc.get_chains().await.unwrap();
        assert_eq!(chains.len(), 1);
        let links = svc.get_links(chains[0].id).await.unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].is_exist);
        assert!(!links[1].is_exist);
    }

    #[tokio::test]
    async fn gapped_dat_file_produces_no_measures() {
        let dir = tempfile::tempdir().unwrap();
        let grav = dir.path().join("grav");
        let seis = dir.path().join("seis");
        std::fs::create_dir_all(&grav).unwrap();
        std::fs::create_dir_all(&seis).unwrap();

        // Gap at T+120: [T, T+60, T+180].
        write_dat(
            &grav,
            "1418_1081_12.dat",
            &["03:10:00", "03:11:00", "03:13:00"],
        );

        let config = test_config(&grav, &seis, dir.path());
        let provider = RawSeisProvider::new(config.seismic.clone());
        let svc = GravService::open_local(":memory:").await.unwrap();

        let summary = load_all(&svc, &config, &provider).await.unwrap();
        assert_eq!(summary.dat_files, 0);
        assert!(
            svc.get_dat_file_by_filename("1418_1081_12.dat")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn reload_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let grav = dir.path().join("grav");
        let seis = dir.path().join("seis");
        std::fs::create_dir_all(&grav).unwrap();
        std::fs::create_dir_all(&seis).unwrap();
        write_dat(&grav, "1418_1081_12.dat", &["03:10:00", "03:11:00"]);

        let config = test_config(&grav, &seis, dir.path());
        let provider = RawSeisProvider::new(config.seismic.clone());
        let svc = GravService::open_local(":memory:").await.unwrap();

        load_all(&svc, &config, &provider).await.unwrap();
        load_all(&svc, &config, &provider).await.unwrap();

        let dat = svc
            .get_dat_file_by_filename("1418_1081_12.dat")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(svc.get_measures(dat.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn coordinates_upserted_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let grav = dir.path().join("grav");
        let seis = dir.path().join("seis");
        std::fs::create_dir_all(&grav).unwrap();
        std::fs::create_dir_all(&seis).unwrap();
        let table = dir.path().join("coords.csv");
        std::fs::write(&table, "name,x,y\n1081,61.25,73.39\n").unwrap();

        let mut config = test_config(&grav, &seis, dir.path());
        config.paths.coordinates = Some(table);
        let provider = RawSeisProvider::new(config.seismic.clone());
        let svc = GravService::open_local(":memory:").await.unwrap();

        let summary = load_all(&svc, &config, &provider).await.unwrap();
        assert_eq!(summary.coordinates, 1);

        let id = svc.get_or_create_station("1081").await.unwrap();
        let station = svc.get_station(id).await.unwrap();
        assert_eq!(station.latitude, Some(61.25));
    }
}
