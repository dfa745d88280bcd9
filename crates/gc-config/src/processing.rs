//! Band-pass limits, window size, and correction model selection.

use gc_core::CorrectionModelKind;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_f_min() -> f64 {
    0.1
}

const fn default_f_max() -> f64 {
    10.0
}

const fn default_window_seconds() -> u32 {
    60
}

fn default_model() -> String {
    CorrectionModelKind::SeismicEnergy.as_str().to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessingConfig {
    /// Lower band-pass frequency, Hz.
    #[serde(default = "default_f_min")]
    pub f_min: f64,

    /// Upper band-pass frequency, Hz.
    #[serde(default = "default_f_max")]
    pub f_max: f64,

    /// Energy sub-window size in seconds. One gravimetric minute by default.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u32,

    /// Correction model name: `seismic_energy` or `level_clamped`.
    #[serde(default = "default_model")]
    pub correction_model: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            f_min: default_f_min(),
            f_max: default_f_max(),
            window_seconds: default_window_seconds(),
            correction_model: default_model(),
        }
    }
}

impl ProcessingConfig {
    /// Parse the configured correction model, failing fast on an unknown name.
    pub fn model_kind(&self) -> Result<CorrectionModelKind, ConfigError> {
        self.correction_model
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "processing.correction_model".to_string(),
                reason: format!("unknown model '{}'", self.correction_model),
            })
    }

    /// Band-pass limits as an ordered pair.
    pub fn bandpass(&self) -> Result<(f64, f64), ConfigError> {
        if !(self.f_min >= 0.0 && self.f_max > self.f_min) {
            return Err(ConfigError::InvalidValue {
                field: "processing.f_min/f_max".to_string(),
                reason: format!("invalid band [{}, {}]", self.f_min, self.f_max),
            });
        }
        Ok((self.f_min, self.f_max))
    }
}
