use serde::{Deserialize, Serialize};

/// A named survey point, optionally carrying geodetic coordinates.
///
/// Created on first observation; coordinates are upserted when a coordinate
/// table provides them (last write wins).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
