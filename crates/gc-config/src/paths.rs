//! Project root paths: where instrument files live and where results go.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root folder walked for gravimetric `.dat`/`.tsf` files and chain files.
    #[serde(default)]
    pub gravimetric_root: PathBuf,

    /// Root folder walked for seismic record files.
    #[serde(default)]
    pub seismic_root: PathBuf,

    /// Folder receiving the project database and correction exports.
    #[serde(default)]
    pub export_root: PathBuf,

    /// Optional station coordinate table (comma-separated `name,x,y`).
    #[serde(default)]
    pub coordinates: Option<PathBuf>,
}
