//! Light-source registry and photometric model for eclipse coupling.
//!
//! This crate owns the caller-facing data model: a planet track, a
//! fixed-capacity [`SourceRegistry`] of point/disk light sources, and the
//! per-source [`SourceEphemeris`] (apparent RA/DEC, distance, angular
//! extent, insolation) derived from them. Eclipse detection and
//! resolution live in `grahan_search`.

pub mod config;
pub mod ephemeris;
pub mod error;
pub mod insolation;
pub mod registry;
pub mod series;
pub mod source;

pub use config::{CouplingConfig, DEFAULT_NPOINTS, DEFAULT_OUTPUT_FILE};
pub use ephemeris::{SourceEphemeris, derive_ephemeris};
pub use error::CouplingError;
pub use insolation::{
    AU_PER_SOLAR_RADIUS, SOLAR_FLUX_1AU_WM2, angular_extent, attenuate, unocculted_flux,
};
pub use registry::SourceRegistry;
pub use series::Series;
pub use source::{PlanetTrack, SourceId, SourceSpec};
