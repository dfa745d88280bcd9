use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One gravimetric value at a specific minute timestamp.
///
/// `is_bad` defaults to false and is set only by the defect propagator from
/// cycle-marker data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinuteMeasure {
    pub id: i64,
    pub dat_file_id: i64,
    pub datetime_val: NaiveDateTime,
    pub grav_value: f64,
    pub is_bad: bool,
}
