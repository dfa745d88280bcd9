//! Chain files: one measurement campaign per file.
//!
//! Plain `.txt`, named `chain_<sensor-part>_<YYYY-MM-DD>.txt`, one
//! gravimetric filename per line. The line number is the link index — blank
//! lines keep their index so the file's numbering stays aligned with the
//! cycle-marker session indexing.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::dat::is_dat_file;
use crate::error::FormatError;

pub const CHAIN_EXTENSION: &str = "txt";

/// One parsed chain file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRecord {
    pub path: PathBuf,
    pub sensor_part: String,
    pub date: NaiveDate,
    /// (link index, gravimetric filename), ascending by index.
    pub links: Vec<(i64, String)>,
}

impl ChainRecord {
    /// Parse a chain file.
    ///
    /// # Errors
    ///
    /// `WrongFormat` when the extension is not `.txt` or the file is actually
    /// a CG-6 survey; `Malformed` when the filename lacks the sensor-part or
    /// date components.
    pub fn open(path: &Path) -> Result<Self, FormatError> {
        if path.extension().and_then(|e| e.to_str()) != Some(CHAIN_EXTENSION) {
            return Err(FormatError::wrong_format(path, "chain"));
        }
        if is_dat_file(path) {
            return Err(FormatError::wrong_format(path, "chain"));
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let parts: Vec<&str> = stem.split('_').collect();
        let sensor_part = parts
            .get(1)
            .copied()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| FormatError::malformed(path, "missing sensor part in filename"))?
            .to_string();
        let date = parts
            .get(2)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| FormatError::malformed(path, "missing date in filename"))?;

        let content = std::fs::read_to_string(path).map_err(|e| FormatError::io(path, e))?;
        // Cycle-marker files share the extension and naming scheme.
        if content.lines().next().map(str::trim_end) == Some(crate::cycle::CYCLE_HEADER) {
            return Err(FormatError::wrong_format(path, "chain"));
        }
        let links: Vec<(i64, String)> = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let name = line.trim();
                (!name.is_empty()).then(|| (i as i64, name.to_string()))
            })
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            sensor_part,
            date,
            links,
        })
    }
}
