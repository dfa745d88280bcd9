//! Fully derived record sets: cleared and rebuilt on every processing run,
//! never incrementally patched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The resolved overlapping window between one gravimetric and one seismic
/// file observed at the same station.
///
/// Bounds are a subset of both source files' ranges and `start` lies on the
/// gravimetric minute grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeIntersection {
    pub id: i64,
    pub dat_file_id: i64,
    pub seis_file_id: i64,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
}

/// Band-limited seismic energy for one 60-second window of an intersection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinuteEnergy {
    pub id: i64,
    pub intersection_id: i64,
    /// Window index within the intersection, starting at 0.
    pub minute_index: i64,
    pub energy_x: f64,
    pub energy_y: f64,
    pub energy_z: f64,
    pub energy_full: f64,
}

/// One scalar correction value tied to a (intersection, minute-index) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Correction {
    pub id: i64,
    pub intersection_id: i64,
    pub minute_index: i64,
    pub value: f64,
}
