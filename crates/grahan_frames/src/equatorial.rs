//! Apparent equatorial coordinates of a source as seen from a planet.
//!
//! The planet's rotational pole (the "north" vector) is the declination
//! reference: declination is the elevation of the line of sight above the
//! plane perpendicular to the pole. Right ascension is then measured with
//! the fixed axis ordering
//!
//! ```text
//! ra = atan2(v_y·cos(dec) − v_z·sin(dec), v_x)
//! ```
//!
//! where `v = source − planet`. This is the convention the downstream
//! boundary-condition loader expects; it is not a general-purpose
//! equatorial rotation and must not be replaced by one.

use crate::error::FrameError;
use crate::vector::{dot, is_finite3, norm, sub};

/// Apparent position of a source on the planet's sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentCoords {
    /// Right ascension in radians, range (-π, π].
    pub ra_rad: f64,
    /// Declination in radians, range [-π/2, π/2].
    pub dec_rad: f64,
    /// Planet-source distance in AU.
    pub distance_au: f64,
}

/// Compute RA, DEC, and distance of `source` seen from `planet`.
///
/// All three vectors share one cartesian frame (AU). `north` only needs a
/// direction; its length is irrelevant but must be non-zero.
pub fn apparent_equatorial(
    planet: &[f64; 3],
    north: &[f64; 3],
    source: &[f64; 3],
) -> Result<ApparentCoords, FrameError> {
    if !is_finite3(planet) || !is_finite3(north) || !is_finite3(source) {
        return Err(FrameError::NonFinite);
    }

    let v = sub(source, planet);
    let distance = norm(&v);
    if distance == 0.0 {
        return Err(FrameError::ZeroDistance);
    }
    let north_len = norm(north);
    if north_len == 0.0 {
        return Err(FrameError::ZeroNorthVector);
    }

    let cos_polar = (dot(&v, north) / (distance * north_len)).clamp(-1.0, 1.0);
    let dec = -(cos_polar.acos() - 0.5 * std::f64::consts::PI);
    let ra = (v[1] * dec.cos() - v[2] * dec.sin()).atan2(v[0]);

    Ok(ApparentCoords {
        ra_rad: ra,
        dec_rad: dec,
        distance_au: distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f64 = 1e-12;
    const Z_UP: [f64; 3] = [0.0, 0.0, 1.0];

    #[test]
    fn along_x_axis() {
        let c = apparent_equatorial(&[0.0; 3], &Z_UP, &[1.0, 0.0, 0.0]).unwrap();
        assert!(c.ra_rad.abs() < EPS);
        assert!(c.dec_rad.abs() < EPS);
        assert!((c.distance_au - 1.0).abs() < EPS);
    }

    #[test]
    fn along_y_axis() {
        let c = apparent_equatorial(&[0.0; 3], &Z_UP, &[0.0, 2.0, 0.0]).unwrap();
        assert!((c.ra_rad - FRAC_PI_2).abs() < EPS);
        assert!(c.dec_rad.abs() < EPS);
        assert!((c.distance_au - 2.0).abs() < EPS);
    }

    #[test]
    fn along_negative_x() {
        let c = apparent_equatorial(&[0.0; 3], &Z_UP, &[-1.0, 0.0, 0.0]).unwrap();
        assert!((c.ra_rad.abs() - PI).abs() < EPS);
    }

    #[test]
    fn pole_direction_gives_max_declination() {
        let c = apparent_equatorial(&[0.0; 3], &Z_UP, &[0.0, 0.0, 5.0]).unwrap();
        assert!((c.dec_rad - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn declination_uses_north_vector_not_z() {
        // Pole along +x: a source along +x sits at the celestial pole.
        let c = apparent_equatorial(&[0.0; 3], &[3.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap();
        assert!((c.dec_rad - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn planet_offset_is_subtracted() {
        let c = apparent_equatorial(&[1.0, 1.0, 0.0], &Z_UP, &[2.0, 1.0, 1.0]).unwrap();
        assert!((c.dec_rad - FRAC_PI_4).abs() < EPS);
        assert!((c.distance_au - 2.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn right_ascension_axis_ordering() {
        let v = [0.3, 0.4, 0.5];
        let c = apparent_equatorial(&[0.0; 3], &Z_UP, &v).unwrap();
        let expected = (v[1] * c.dec_rad.cos() - v[2] * c.dec_rad.sin()).atan2(v[0]);
        assert!((c.ra_rad - expected).abs() < EPS);
    }

    #[test]
    fn zero_distance_rejected() {
        let p = [0.5, -0.25, 2.0];
        assert_eq!(
            apparent_equatorial(&p, &Z_UP, &p),
            Err(FrameError::ZeroDistance)
        );
    }

    #[test]
    fn zero_north_rejected() {
        assert_eq!(
            apparent_equatorial(&[0.0; 3], &[0.0; 3], &[1.0, 0.0, 0.0]),
            Err(FrameError::ZeroNorthVector)
        );
    }

    #[test]
    fn nan_rejected() {
        assert_eq!(
            apparent_equatorial(&[0.0; 3], &Z_UP, &[f64::NAN, 0.0, 0.0]),
            Err(FrameError::NonFinite)
        );
    }
}
