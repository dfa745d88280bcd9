//! Time intersection resolver.
//!
//! Gravimetric minute stamps fall on a regular 60-second grid, but the
//! seismic stream's second-of-minute offset is arbitrary. The resolved
//! intersection of the two ranges is aligned to the gravimetric grid by
//! overwriting the seismic timestamp's seconds field with the gravimetric
//! one and nudging the candidate back inside the seismic range.

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::{debug, info};

use gc_db::GravService;

use crate::error::PipelineError;

/// Carry the gravimetric grid offset onto the seismic timestamp.
fn grid_candidate(grav: NaiveDateTime, seis: NaiveDateTime) -> NaiveDateTime {
    seis - Duration::seconds(i64::from(seis.second()))
        + Duration::seconds(i64::from(grav.second()))
}

/// Left intersection edge for a gravimetric start and a seismic start.
pub fn align_left(grav: NaiveDateTime, seis: NaiveDateTime) -> NaiveDateTime {
    if seis <= grav {
        return grav;
    }
    let candidate = grid_candidate(grav, seis);
    if candidate < seis {
        candidate + Duration::minutes(1)
    } else {
        candidate
    }
}

/// Right intersection edge for a gravimetric stop and a seismic stop.
pub fn align_right(grav: NaiveDateTime, seis: NaiveDateTime) -> NaiveDateTime {
    if seis >= grav {
        return grav;
    }
    let candidate = grid_candidate(grav, seis);
    if candidate > seis {
        candidate - Duration::minutes(1)
    } else {
        candidate
    }
}

/// Resolve the grid-aligned intersection of a gravimetric and a seismic
/// range. `None` when the ranges do not overlap by at least one grid step.
pub fn resolve(
    grav: (NaiveDateTime, NaiveDateTime),
    seis: (NaiveDateTime, NaiveDateTime),
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = align_left(grav.0, seis.0);
    let stop = align_right(grav.1, seis.1);
    (start < stop).then_some((start, stop))
}

/// Rebuild the whole intersection set from the ingested file catalog.
///
/// Runs once per (gravimetric, seismic) file pair sharing a station; the
/// prior set is cleared first so the result is always fully derived.
pub async fn recompute_intersections(service: &GravService) -> Result<usize, PipelineError> {
    service.clear_time_intersections().await?;

    let mut emitted = 0usize;
    for (dat, seis) in service.get_station_file_pairs().await? {
        let Some((start, stop)) = resolve(
            (dat.datetime_start, dat.datetime_stop),
            (seis.datetime_start, seis.datetime_stop),
        ) else {
            debug!(dat = %dat.path, seis = %seis.path, "no usable overlap");
            continue;
        };
        service
            .insert_time_intersection(dat.id, seis.id, start, stop)
            .await?;
        emitted += 1;
    }

    info!(intersections = emitted, "intersection set recomputed");
    Ok(emitted)
}
