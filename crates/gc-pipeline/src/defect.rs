//! Defect propagation from reviewed cycle-marker files.
//!
//! Each chain may have a reviewed marker file beside it (see
//! [`gc_formats::cycle_file_for`]). Every (session, cycle) marker sets the
//! `is_bad` flag on the cycle-th minute of the session-th link's
//! gravimetric file. Markers with no matching link, file, or minute leave
//! the defaults in place.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use gc_db::GravService;
use gc_formats::{cycle_file_for, parse_cycle_file};

use crate::error::PipelineError;

/// Apply every chain's cycle markers to its minute measures.
///
/// Returns the number of markers applied. Missing or malformed marker
/// files skip that chain only.
pub async fn propagate_defects(service: &GravService) -> Result<usize, PipelineError> {
    let mut applied = 0usize;
    for chain in service.get_chains().await? {
        let marker_path = cycle_file_for(Path::new(&chain.path));
        if !marker_path.exists() {
            debug!(chain = %chain.path, "no cycle-marker file, keeping defaults");
            continue;
        }
        let markers = match parse_cycle_file(&marker_path) {
            Ok(markers) => markers,
            Err(error) => {
                warn!(path = %marker_path.display(), %error, "cycle-marker file skipped");
                continue;
            }
        };

        // Resolve each link's gravimetric file once per chain.
        let mut dat_by_index: HashMap<i64, Option<i64>> = HashMap::new();
        for link in service.get_links(chain.id).await? {
            let dat_id = if link.is_exist {
                service
                    .get_dat_file_by_filename(&link.filename)
                    .await?
                    .map(|dat| dat.id)
            } else {
                None
            };
            dat_by_index.insert(link.link_index, dat_id);
        }

        for marker in markers {
            let Some(Some(dat_file_id)) = dat_by_index.get(&marker.session).copied() else {
                debug!(
                    chain = %chain.path,
                    session = marker.session,
                    "marker has no ingested link file"
                );
                continue;
            };
            service
                .set_measure_defect_by_offset(dat_file_id, marker.cycle, marker.is_bad)
                .await?;
            applied += 1;
        }
    }

    info!(markers = applied, "defect flags propagated");
    Ok(applied)
}
