//! Eclipse coupling engine: occultation between light sources as seen from
//! a planet, and the boundary-condition export for the climate simulator.
//!
//! This crate provides:
//! - Pairwise overlap detection with simple/compound classification
//! - Closed-form lens-area occultation for isolated pairs
//! - Eclipse-forest resolution of clustered occultations, with sunflower
//!   sampling where occulters overlap each other
//! - The end-to-end [`couple`] / [`couple_and_export`] pipeline

pub mod compound;
pub mod coupling;
pub mod event;
pub mod exact;
pub mod export;
pub mod pairs;
pub mod sky;
pub mod sunflower;
pub mod tree;

pub use compound::resolve_compound;
pub use coupling::{CouplingReport, couple, couple_and_export};
pub use event::{EclipseEvent, EclipseMethod};
pub use exact::{CONTAINMENT_TOLERANCE, exact_occluded_fraction, lens_area, resolve_simple};
pub use export::{format_boundary_rows, write_boundary_file};
pub use pairs::{EclipseFlag, EclipsePair, PairTable, scan_pairs};
pub use sky::{Disk, Sky};
pub use sunflower::{DiskSampler, sunflower};
pub use tree::EclipseForest;
