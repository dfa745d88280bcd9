//! # gc-pipeline
//!
//! The correlation and correction engine for Gravicorr:
//! - [`loader`]: walk the project roots and ingest the file catalog
//! - [`intersect`]: resolve grid-aligned gravimetric/seismic overlaps
//! - [`energy`]: band-limited spectral energy per 60-second sub-window
//! - [`correction`]: the two correction models behind one strategy trait
//! - [`defect`]: propagate reviewed cycle markers onto minute measures
//! - [`export`]: per-chain, per-sensor-pair correction files
//! - [`run`]: the [`Pipeline`] tying the phases together
//!
//! The three derived sets (intersections, energies, corrections) are always
//! cleared and rebuilt as a whole; nothing in this crate patches them
//! incrementally.

pub mod correction;
pub mod defect;
pub mod energy;
pub mod error;
pub mod export;
pub mod intersect;
pub mod loader;
pub mod run;

pub use error::PipelineError;
pub use run::{PROJECT_DB_NAME, Pipeline};
