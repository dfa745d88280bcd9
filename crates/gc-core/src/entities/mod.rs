//! Entity structs for all Gravicorr domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `gc-db/migrations/001_initial.sql`). Surrogate ids are `i64` rowids
//! assigned by the database.

mod chain;
mod derived;
mod device;
mod files;
mod measure;
mod pair;
mod station;

pub use chain::{Chain, Link};
pub use derived::{Correction, MinuteEnergy, TimeIntersection};
pub use device::{Gravimeter, Seismometer};
pub use files::{DatFile, SeisFile, TsfFile};
pub use measure::MinuteMeasure;
pub use pair::{PostCorrection, SensorPair};
pub use station::Station;
