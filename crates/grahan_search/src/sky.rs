//! Read-only view of the active sources' derived geometry.
//!
//! Sources are addressed by their slot in the active list (registry order,
//! unset sources removed). All eclipse stages work on slots; results are
//! mapped back to [`SourceId`] when reported.

use std::cmp::Ordering;

use grahan_core::{SourceEphemeris, SourceId};
use grahan_frames::angular_separation;

/// Sky position and angular radius of one disk at one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub ra_rad: f64,
    pub dec_rad: f64,
    /// Angular radius (half the extent), radians.
    pub radius_rad: f64,
}

/// Active sources for one coupling run.
#[derive(Debug, Clone, Copy)]
pub struct Sky<'a> {
    sources: &'a [SourceEphemeris],
}

impl<'a> Sky<'a> {
    pub fn new(sources: &'a [SourceEphemeris]) -> Self {
        Self { sources }
    }

    /// Number of active sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn id(&self, slot: usize) -> SourceId {
        self.sources[slot].id
    }

    pub fn disk(&self, slot: usize, t: usize) -> Disk {
        let eph = &self.sources[slot];
        Disk {
            ra_rad: eph.ra_rad[t],
            dec_rad: eph.dec_rad[t],
            radius_rad: eph.angular_radius(t),
        }
    }

    pub fn distance(&self, slot: usize, t: usize) -> f64 {
        self.sources[slot].distance_au[t]
    }

    /// Great-circle separation between two sources' centers at `t`.
    pub fn separation(&self, a: usize, b: usize, t: usize) -> f64 {
        let (ea, eb) = (&self.sources[a], &self.sources[b]);
        angular_separation(ea.ra_rad[t], ea.dec_rad[t], eb.ra_rad[t], eb.dec_rad[t])
    }

    /// Order two slots farthest-first at `t`.
    ///
    /// Equal distances put the lower slot (lower id) first.
    pub fn farther_first(&self, a: usize, b: usize, t: usize) -> (usize, usize) {
        match self.cmp_farther(a, b, t) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        }
    }

    /// Ordering that sorts slots by decreasing distance, ties by slot.
    pub fn cmp_farther(&self, a: usize, b: usize, t: usize) -> Ordering {
        self.distance(b, t)
            .total_cmp(&self.distance(a, t))
            .then(a.cmp(&b))
    }
}
