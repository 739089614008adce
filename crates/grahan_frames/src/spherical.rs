//! Spherical geometry on the planet's celestial sphere.

/// Great-circle separation between two sky positions, in radians.
///
/// Spherical law of cosines; the cosine is clamped to [-1, 1] so that
/// coincident points give exactly zero instead of a rounding NaN.
/// Non-finite inputs still produce NaN.
pub fn angular_separation(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    let cos_sep = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * (ra1 - ra2).cos();
    cos_sep.clamp(-1.0, 1.0).acos()
}

/// Map a tangent-plane offset around (`ra`, `dec`) onto the sphere.
///
/// The offset `(dy, dz)` lives on the plane tangent to the sphere at
/// RA = DEC = 0, with `dy` pointing toward increasing RA and `dz` toward
/// increasing DEC. The point `(1, dy, dz)` is rotated by `dec` about the
/// y-axis, then by `ra` about the z-axis, and projected back onto the unit
/// sphere. Returns `(ra, dec)` of the rotated point in radians.
///
/// An offset of length `tan(θ)` lands exactly `θ` away from the center.
pub fn disk_point_to_sky(ra: f64, dec: f64, dy: f64, dz: f64) -> (f64, f64) {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();

    let tilted = cos_dec - dz * sin_dec;
    let x = tilted * cos_ra - dy * sin_ra;
    let y = tilted * sin_ra + dy * cos_ra;
    let z = sin_dec + dz * cos_dec;

    let len = (x * x + y * y + z * z).sqrt();
    let point_dec = (z / len).clamp(-1.0, 1.0).asin();
    let point_ra = y.atan2(x);
    (point_ra, point_dec)
}
