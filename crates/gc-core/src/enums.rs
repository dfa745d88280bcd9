//! Shared enums: signal axes and correction model selection.
//!
//! All enums use `snake_case` serialization and provide `as_str()` for SQL
//! storage and config round-trips.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// One of the three orthogonal seismometer axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in channel order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Return the string representation used in storage and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    /// Channel index within an interleaved three-component record.
    #[must_use]
    pub const fn channel(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CorrectionModelKind
// ---------------------------------------------------------------------------

/// Which correction formula the calculator applies.
///
/// Selected by configuration; an unrecognized name is a startup error, never
/// a per-minute one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionModelKind {
    /// Pure seismic-energy model: `A * (1 - 1/sqrt(energy_ratio))`.
    SeismicEnergy,
    /// Energy model with the corrected value clamped at the quiet level.
    LevelClamped,
}

impl CorrectionModelKind {
    /// Return the string representation used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeismicEnergy => "seismic_energy",
            Self::LevelClamped => "level_clamped",
        }
    }
}

impl FromStr for CorrectionModelKind {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seismic_energy" => Ok(Self::SeismicEnergy),
            "level_clamped" => Ok(Self::LevelClamped),
            other => Err(crate::CoreError::Validation(format!(
                "unknown correction model: {other}"
            ))),
        }
    }
}

impl fmt::Display for CorrectionModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
