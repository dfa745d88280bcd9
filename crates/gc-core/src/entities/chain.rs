use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One measurement campaign for a seismometer part-number.
///
/// Owns an ordered sequence of [`Link`]s and references the cycle-marker
/// file the chain was loaded from. Link order is carried by the explicit
/// `link_index` field, never by insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chain {
    pub id: i64,
    pub seismometer_part: String,
    /// Path of the chain/cycle file this chain was registered from.
    pub path: String,
    pub date: NaiveDate,
}

/// One gravimetric session within a chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub chain_id: i64,
    /// Position within the chain; matches the cycle file's session indexing.
    pub link_index: i64,
    /// Gravimetric filename this link references.
    pub filename: String,
    /// Set when the referenced gravimetric file was actually ingested.
    pub is_exist: bool,
}
