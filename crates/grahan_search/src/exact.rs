//! Closed-form occultation of one disk by another.
//!
//! Standard two-circle intersection ("lens") area on the tangent plane:
//!
//! ```text
//! A = r₁²·acos((d² + r₁² − r₂²) / 2dr₁)
//!   + r₂²·acos((d² − r₁² + r₂²) / 2dr₂)
//!   − ½·√((r₁+r₂−d)(r₁−r₂+d)(−r₁+r₂+d)(r₁+r₂+d))
//! ```
//!
//! with the full-containment case (smaller disk entirely inside the larger)
//! short-circuited to π·min(r₁, r₂)². Angular radii are small enough that
//! the flat-plane formula is used directly on angles.

use std::f64::consts::PI;

use grahan_core::CouplingError;

use crate::event::{EclipseEvent, EclipseMethod};
use crate::pairs::{EclipseFlag, PairTable};
use crate::sky::Sky;

/// Relative slack (in units of the smaller radius) for treating a disk as
/// fully contained.
pub const CONTAINMENT_TOLERANCE: f64 = 1.0e-5;

/// Area of intersection of two circles of radii `r1`, `r2` whose centers
/// are `separation` apart. Symmetric in `r1` and `r2`.
pub fn lens_area(r1: f64, r2: f64, separation: f64) -> f64 {
    let (small, large) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
    let d = separation;

    if d + small <= large + CONTAINMENT_TOLERANCE * small {
        return PI * small * small;
    }
    if d >= r1 + r2 {
        return 0.0;
    }

    let outer = (r1 + r2 - d) * (r1 + r2 + d);
    let inner = (r1 - r2 + d) * (r2 - r1 + d);
    segment(r1, r2, d) + segment(r2, r1, d) - 0.5 * (outer * inner).max(0.0).sqrt()
}

/// `r²·acos(...)` term of the lens formula for the circle of radius `r`.
fn segment(r: f64, other: f64, d: f64) -> f64 {
    let cos_half = (d * d + r * r - other * other) / (2.0 * d * r);
    r * r * cos_half.clamp(-1.0, 1.0).acos()
}

/// Fraction of the far disk (`r_far`) hidden by the near disk (`r_near`).
///
/// Capped at 1; a zero-radius far source is either fully hidden or not.
pub fn exact_occluded_fraction(r_far: f64, r_near: f64, separation: f64) -> f64 {
    if r_far <= 0.0 {
        return if separation <= r_near { 1.0 } else { 0.0 };
    }
    (lens_area(r_far, r_near, separation) / (PI * r_far * r_far)).min(1.0)
}

/// Resolve every pair flagged simple at `t` in closed form.
///
/// The farther member of each pair is the occulted one.
pub fn resolve_simple(
    table: &PairTable,
    sky: &Sky<'_>,
    t: usize,
) -> Result<Vec<EclipseEvent>, CouplingError> {
    let mut events = Vec::new();
    for pair in table.flagged_at(t, EclipseFlag::Simple) {
        let (far, near) = sky.farther_first(pair.a, pair.b, t);
        let fraction = exact_occluded_fraction(
            sky.disk(far, t).radius_rad,
            sky.disk(near, t).radius_rad,
            pair.separation_rad[t],
        );
        if !fraction.is_finite() {
            return Err(CouplingError::NonFinite {
                stage: "exact occultation",
                timestep: t,
            });
        }
        events.push(EclipseEvent {
            timestep: t,
            target: sky.id(far),
            occulters: vec![sky.id(near)],
            occluded_fraction: fraction,
            method: EclipseMethod::Exact,
            compound: false,
        });
    }
    Ok(events)
}
