//! Derived per-source, per-timestep sky positions and flux.

use grahan_frames::apparent_equatorial;

use crate::error::CouplingError;
use crate::insolation::{angular_extent, attenuate, unocculted_flux};
use crate::source::{SourceId, SourceSpec};

/// Everything the coupling stages derive for one source.
///
/// All vectors have the run's timestep count as length.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEphemeris {
    pub id: SourceId,
    /// Right ascension, radians.
    pub ra_rad: Vec<f64>,
    /// Declination, radians.
    pub dec_rad: Vec<f64>,
    /// Distance from the planet, AU.
    pub distance_au: Vec<f64>,
    /// Full angular diameter, radians.
    pub extent_rad: Vec<f64>,
    /// Flux before any occultation, W/m².
    pub unocculted_wm2: Vec<f64>,
    /// Flux after occultation, W/m².
    pub insolation_wm2: Vec<f64>,
    /// Combined fraction of the disk hidden, [0, 1].
    pub occluded_fraction: Vec<f64>,
}

impl SourceEphemeris {
    pub fn len(&self) -> usize {
        self.ra_rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra_rad.is_empty()
    }

    /// Angular radius (half the extent) at timestep `t`, radians.
    pub fn angular_radius(&self, t: usize) -> f64 {
        0.5 * self.extent_rad[t]
    }

    /// Hide a further `fraction` of the disk at timestep `t`.
    ///
    /// Repeated calls compose multiplicatively on the flux.
    pub fn occlude(&mut self, t: usize, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.insolation_wm2[t] = attenuate(self.insolation_wm2[t], fraction);
        let visible = (1.0 - self.occluded_fraction[t]) * (1.0 - fraction);
        self.occluded_fraction[t] = 1.0 - visible;
    }
}

/// Derive RA, DEC, distance, extent, and unocculted flux for one source.
///
/// `planet` and `north` must already be broadcast to `n` timesteps.
pub fn derive_ephemeris(
    id: SourceId,
    spec: &SourceSpec,
    planet: &[[f64; 3]],
    north: &[[f64; 3]],
    n: usize,
) -> Result<SourceEphemeris, CouplingError> {
    let position = spec
        .position_au
        .broadcast(n, &format!("source {id} position"))?;
    let radius = spec.radius_rsun.broadcast(n, &format!("source {id} radius"))?;
    let luminosity = spec
        .luminosity_lsun
        .broadcast(n, &format!("source {id} luminosity"))?;

    let mut eph = SourceEphemeris {
        id,
        ra_rad: Vec::with_capacity(n),
        dec_rad: Vec::with_capacity(n),
        distance_au: Vec::with_capacity(n),
        extent_rad: Vec::with_capacity(n),
        unocculted_wm2: Vec::with_capacity(n),
        insolation_wm2: Vec::with_capacity(n),
        occluded_fraction: vec![0.0; n],
    };

    for t in 0..n {
        let coords = apparent_equatorial(&planet[t], &north[t], &position[t])
            .map_err(|e| CouplingError::from_frame(id.index(), t, e))?;
        let flux = unocculted_flux(luminosity[t], coords.distance_au);
        let extent = angular_extent(radius[t], coords.distance_au);
        if !flux.is_finite() || !extent.is_finite() {
            return Err(CouplingError::NonFinite {
                stage: "insolation",
                timestep: t,
            });
        }

        eph.ra_rad.push(coords.ra_rad);
        eph.dec_rad.push(coords.dec_rad);
        eph.distance_au.push(coords.distance_au);
        eph.extent_rad.push(extent);
        eph.unocculted_wm2.push(flux);
        eph.insolation_wm2.push(flux);
    }

    Ok(eph)
}
