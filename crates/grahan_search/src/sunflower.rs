//! Deterministic sunflower (Fibonacci spiral) sampling of a disk.
//!
//! Point k of n (1-based) sits at radius √(k − ½)/√(n − (b+1)/2) and angle
//! 2πk/φ², where b = round(α·√n) outermost points are pinned to the rim.
//! The pattern covers the disk evenly, so the share of points hidden by a
//! set of occulters approximates the hidden area fraction.

use grahan_frames::{angular_separation, disk_point_to_sky};

use crate::sky::Disk;

/// Sunflower points on the unit disk, as `[y, z]` offsets.
pub fn sunflower(npoints: usize, alpha: f64) -> Vec<[f64; 2]> {
    let n = npoints as f64;
    let golden = 0.5 * (1.0 + 5.0_f64.sqrt());
    let stride = 2.0 * std::f64::consts::PI / (golden * golden);
    let boundary = ((alpha * n.sqrt()).round() as usize).min(npoints);
    let interior_norm = (n - (boundary as f64 + 1.0) / 2.0).sqrt();

    (1..=npoints)
        .map(|k| {
            let kf = k as f64;
            let r = if k > npoints - boundary {
                1.0
            } else {
                (kf - 0.5).sqrt() / interior_norm
            };
            let theta = kf * stride;
            [r * theta.cos(), r * theta.sin()]
        })
        .collect()
}

/// A reusable sunflower pattern for occulted-fraction estimates.
#[derive(Debug, Clone)]
pub struct DiskSampler {
    unit: Vec<[f64; 2]>,
}

impl DiskSampler {
    pub fn new(npoints: usize, alpha: f64) -> Self {
        Self {
            unit: sunflower(npoints, alpha),
        }
    }

    pub fn len(&self) -> usize {
        self.unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unit.is_empty()
    }

    /// Fraction of `target`'s disk hidden by the union of `occulters`.
    ///
    /// Each sample is scaled to the target's angular radius on the tangent
    /// plane, rotated onto the sky at the target's RA/DEC, and counted once
    /// if it falls within any occulter's angular radius.
    pub fn hidden_fraction(&self, target: &Disk, occulters: &[Disk]) -> f64 {
        if self.unit.is_empty() {
            return 0.0;
        }
        let scale = target.radius_rad.tan();
        let hidden = self
            .unit
            .iter()
            .filter(|p| {
                let (ra, dec) =
                    disk_point_to_sky(target.ra_rad, target.dec_rad, p[0] * scale, p[1] * scale);
                occulters
                    .iter()
                    .any(|o| angular_separation(ra, dec, o.ra_rad, o.dec_rad) <= o.radius_rad)
            })
            .count();
        hidden as f64 / self.unit.len() as f64
    }
}
