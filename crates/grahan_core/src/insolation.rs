//! Photometric and angular-size model for light sources.
//!
//! Flux scales as L/d² from the solar constant; angular size follows from
//! physical radius and distance. Occultation only ever scales flux
//! linearly by the unhidden fraction of the disk.

/// Flux received at 1 AU from a 1 L☉ source, W/m².
pub const SOLAR_FLUX_1AU_WM2: f64 = 1361.1665;

/// One solar radius in AU.
pub const AU_PER_SOLAR_RADIUS: f64 = 0.00465047;

/// Unocculted flux (W/m²) from a source of `luminosity_lsun` at `distance_au`.
pub fn unocculted_flux(luminosity_lsun: f64, distance_au: f64) -> f64 {
    luminosity_lsun * SOLAR_FLUX_1AU_WM2 / (distance_au * distance_au)
}

/// Full angular diameter (radians) of a source of `radius_rsun` at `distance_au`.
///
/// The disk's angular radius is half of this.
pub fn angular_extent(radius_rsun: f64, distance_au: f64) -> f64 {
    2.0 * (radius_rsun * AU_PER_SOLAR_RADIUS / distance_au).atan()
}

/// Flux remaining after `occluded_fraction` of the disk is hidden.
///
/// The fraction is clamped to [0, 1].
pub fn attenuate(flux_wm2: f64, occluded_fraction: f64) -> f64 {
    flux_wm2 * (1.0 - occluded_fraction.clamp(0.0, 1.0))
}
