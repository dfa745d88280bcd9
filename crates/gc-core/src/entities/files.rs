use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One gravimetric minute file (CG-6 `.dat`).
///
/// Immutable once created; uniqueness is enforced by source path, so
/// re-ingesting the same path is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatFile {
    pub id: i64,
    pub gravimeter_id: i64,
    pub station_id: i64,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
    pub path: String,
}

/// One gravimetric continuous second file (`.tsf`).
///
/// Carries only the device number part from its filename; TSF files
/// participate in ingestion but not in time intersections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TsfFile {
    pub id: i64,
    pub dev_num_part: String,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
    pub path: String,
}

/// One seismic record file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeisFile {
    pub id: i64,
    pub seismometer_id: i64,
    pub station_id: i64,
    pub datetime_start: NaiveDateTime,
    pub datetime_stop: NaiveDateTime,
    pub path: String,
}
