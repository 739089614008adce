//! Frame helpers for planet-centred sky geometry.
//!
//! Provides the apparent equatorial transform (cartesian source and planet
//! positions plus a north-pole vector to RA/DEC/distance), great-circle
//! separations on the celestial sphere, and the tangent-plane rotation used
//! to lay sample points over a source's disk.

pub mod equatorial;
pub mod error;
pub mod spherical;
pub mod vector;

pub use equatorial::{ApparentCoords, apparent_equatorial};
pub use error::FrameError;
pub use spherical::{angular_separation, disk_point_to_sky};
pub use vector::{dot, is_finite3, norm, sub};
