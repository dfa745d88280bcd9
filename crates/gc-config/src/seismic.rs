//! Seismic file naming scheme and signal parameters.
//!
//! Seismic filenames encode their attributes in delimiter-separated markers,
//! e.g. `12_1081_K07_2021-09-06_03-10-00.xx` with the default marker layout
//! (order, point, sensor, date, time).

use serde::{Deserialize, Serialize};

fn default_extensions() -> Vec<String> {
    vec!["bin".to_string(), "xx".to_string(), "00".to_string()]
}

fn default_delimiter() -> String {
    "_".to_string()
}

const fn default_sample_rate() -> u32 {
    100
}

/// Zero-based positions of each attribute within the split filename stem.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FilenameMarkers {
    pub order: usize,
    pub point: usize,
    pub sensor: usize,
    pub date: usize,
    pub time: usize,
}

impl Default for FilenameMarkers {
    fn default() -> Self {
        Self {
            order: 0,
            point: 1,
            sensor: 2,
            date: 3,
            time: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeismicConfig {
    /// File extensions treated as seismic records.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Delimiter between filename markers.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    #[serde(default)]
    pub markers: FilenameMarkers,

    /// Sampling rate of the raw signal files, in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            delimiter: default_delimiter(),
            markers: FilenameMarkers::default(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl SeismicConfig {
    /// Whether a filename's extension marks it as a seismic record.
    #[must_use]
    pub fn is_seismic_file(&self, filename: &str) -> bool {
        filename
            .rsplit('.')
            .next()
            .is_some_and(|ext| self.extensions.iter().any(|x| x == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_layout() {
        let config = SeismicConfig::default();
        assert_eq!(config.markers.order, 0);
        assert_eq!(config.markers.time, 4);
        assert_eq!(config.sample_rate, 100);
    }

    #[test]
    fn extension_filter() {
        let config = SeismicConfig::default();
        assert!(config.is_seismic_file("12_1081_K07_2021-09-06_03-10-00.xx"));
        assert!(config.is_seismic_file("a_b_c_d_e.bin"));
        assert!(!config.is_seismic_file("report.txt"));
    }
}
