//! Correction export: one TSV per (chain, sensor pair).
//!
//! Layout under the export root:
//! `{grav_short}-{seis_number}/{chain_date}/{grav_short}/{marker filename}`,
//! date formatted `YYYY_MM_DD`. Rows come from reviewed post-corrections
//! when the pair has them for a link, otherwise from the link's raw minute
//! defect flags with a zero correction.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, info};

use gc_core::entities::{Chain, Link};
use gc_db::GravService;
use gc_formats::{CYCLE_HEADER, cycle_file_for};

use crate::error::PipelineError;

/// One exported correction row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRow {
    pub link_index: i64,
    pub cycle_index: i64,
    pub is_bad: bool,
    pub value: f64,
}

/// Render rows in the fixed four-column cycle format.
#[must_use]
pub fn render_rows(rows: &[ExportRow]) -> String {
    let mut out = String::from(CYCLE_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            row.link_index,
            row.cycle_index,
            i64::from(row.is_bad),
            row.value
        );
    }
    out
}

/// Device pairs to export for one chain: reviewed pairs plus every
/// (link gravimeter, chain seismometer) combination actually ingested.
async fn chain_device_pairs(
    service: &GravService,
    chain: &Chain,
    links: &[Link],
) -> Result<Vec<(i64, i64)>, PipelineError> {
    let seismometer_id = service
        .get_or_create_seismometer(&chain.seismometer_part)
        .await?;

    let mut pairs: BTreeSet<(i64, i64)> = service
        .get_chain_device_pairs(chain.id)
        .await?
        .into_iter()
        .collect();
    for link in links {
        if !link.is_exist {
            continue;
        }
        if let Some(dat) = service.get_dat_file_by_filename(&link.filename).await? {
            pairs.insert((dat.gravimeter_id, seismometer_id));
        }
    }
    Ok(pairs.into_iter().collect())
}

/// Ordered rows for one (chain, gravimeter, seismometer) combination.
async fn pair_rows(
    service: &GravService,
    chain: &Chain,
    links: &[Link],
    gravimeter_id: i64,
    seismometer_id: i64,
) -> Result<Vec<ExportRow>, PipelineError> {
    let mut rows = Vec::new();
    for link in links {
        if let Some(pair) = service
            .get_sensor_pair(chain.id, link.id, gravimeter_id, seismometer_id)
            .await?
        {
            for post in service.get_post_corrections(pair.id).await? {
                rows.push(ExportRow {
                    link_index: link.link_index,
                    cycle_index: post.cycle_index,
                    is_bad: post.is_bad,
                    value: post.value,
                });
            }
            continue;
        }

        // No reviewed corrections: raw defect flags, zero correction.
        if !link.is_exist {
            continue;
        }
        let Some(dat) = service.get_dat_file_by_filename(&link.filename).await? else {
            continue;
        };
        if dat.gravimeter_id != gravimeter_id {
            continue;
        }
        for (cycle_index, measure) in service.get_measures(dat.id).await?.iter().enumerate() {
            rows.push(ExportRow {
                link_index: link.link_index,
                cycle_index: cycle_index as i64,
                is_bad: measure.is_bad,
                value: 0.0,
            });
        }
    }
    Ok(rows)
}

/// Write correction files for every chain and sensor pair.
///
/// Returns the number of files written. Pairs with no rows write nothing;
/// directory creation is idempotent.
pub async fn export_corrections(
    service: &GravService,
    export_root: &Path,
) -> Result<usize, PipelineError> {
    let mut written = 0usize;
    for chain in service.get_chains().await? {
        let links = service.get_links(chain.id).await?;
        let filename = cycle_file_for(Path::new(&chain.path))
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();

        for (gravimeter_id, seismometer_id) in
            chain_device_pairs(service, &chain, &links).await?
        {
            let rows = pair_rows(service, &chain, &links, gravimeter_id, seismometer_id).await?;
            if rows.is_empty() {
                debug!(chain = %chain.path, gravimeter_id, seismometer_id, "nothing to export");
                continue;
            }

            let gravimeter = service.get_gravimeter(gravimeter_id).await?;
            let seismometer = service.get_seismometer(seismometer_id).await?;
            let short = gravimeter.short_number();

            let dir = export_root
                .join(format!("{short}-{}", seismometer.number))
                .join(chain.date.format("%Y_%m_%d").to_string())
                .join(short);
            std::fs::create_dir_all(&dir).map_err(|e| PipelineError::Export {
                path: dir.display().to_string(),
                source: e,
            })?;

            let target = dir.join(&filename);
            std::fs::write(&target, render_rows(&rows)).map_err(|e| PipelineError::Export {
                path: target.display().to_string(),
                source: e,
            })?;
            written += 1;
        }
    }

    info!(files = written, "correction export finished");
    Ok(written)
}
