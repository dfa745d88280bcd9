//! Repository methods, split per entity family. All methods live on
//! [`crate::GravService`].

mod chain;
mod derived;
mod device;
mod files;
mod measure;
mod pair;
mod station;

pub use derived::EnergyRow;
