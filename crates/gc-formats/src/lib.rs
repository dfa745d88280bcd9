//! # gc-formats
//!
//! Instrument record providers for Gravicorr:
//! - CG-6 `.dat` gravimetric minute files
//! - `.tsf` gravimetric continuous second files
//! - chain files (campaign structure) and cycle-marker files (review output)
//! - station coordinate tables
//! - seismic records: filename attribute parsing plus the [`SeismicReader`]
//!   trait and a raw three-channel reader
//!
//! Every parser reports a malformed file as a typed [`FormatError`]; the
//! loader logs and skips, keeping per-file failures local.

mod chain;
mod coords;
mod cycle;
mod dat;
mod error;
mod seismic;
mod tsf;

pub use chain::{CHAIN_EXTENSION, ChainRecord};
pub use coords::{Coordinate, CoordinateColumns, parse_coordinates};
pub use cycle::{CYCLE_HEADER, CycleMarker, cycle_file_for, parse_cycle_file};
pub use dat::{DAT_EXTENSION, DatRecord, is_dat_file};
pub use error::FormatError;
pub use seismic::{
    RawSeisFile, RawSeisProvider, SeisFileAttrs, SeismicProvider, SeismicReader, Signal,
    parse_seis_filename,
};
pub use tsf::{TSF_EXTENSION, TsfRecord};
