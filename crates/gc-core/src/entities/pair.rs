use serde::{Deserialize, Serialize};

/// The observed (gravimeter, seismometer) combination for one chain link.
///
/// Presence of a row marks "reviewed corrections exist" for that link; the
/// export aggregator falls back to raw defect flags otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorPair {
    pub id: i64,
    pub chain_id: i64,
    pub link_id: i64,
    pub gravimeter_id: i64,
    pub seismometer_id: i64,
}

/// One reviewed per-cycle correction row belonging to a sensor pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostCorrection {
    pub id: i64,
    pub sensor_pair_id: i64,
    pub cycle_index: i64,
    pub is_bad: bool,
    pub value: f64,
}
