//! # gc-core
//!
//! Core types shared across all Gravicorr crates:
//! - Entity structs for the measurement hierarchy (devices, stations,
//!   instrument files, chains, links, minute measures)
//! - Derived-set records (time intersections, minute energies, corrections)
//! - The signal axis enum and correction model selector
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;

pub use enums::{Axis, CorrectionModelKind};
pub use errors::CoreError;
