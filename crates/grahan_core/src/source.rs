//! Caller-supplied descriptions of the planet and its light sources.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::series::Series;

/// Stable index of a light source in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(pub usize);

impl SourceId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Planet trajectory and rotational pole, in AU.
///
/// The north vector is a direction relative to the planet; only its
/// orientation matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetTrack {
    #[serde(alias = "position")]
    pub position_au: Series<[f64; 3]>,
    pub north: Series<[f64; 3]>,
}

impl Default for PlanetTrack {
    fn default() -> Self {
        Self {
            position_au: Series::Scalar([0.0; 3]),
            north: Series::Scalar([0.0, 0.0, 1.0]),
        }
    }
}

impl PlanetTrack {
    pub fn new(position_au: impl Into<Series<[f64; 3]>>, north: impl Into<Series<[f64; 3]>>) -> Self {
        Self {
            position_au: position_au.into(),
            north: north.into(),
        }
    }
}

/// A point/disk light source: physical radius, luminosity, and position.
///
/// Radius is in solar radii, luminosity in solar luminosities, position in
/// AU. A source whose position is an empty sequence has never been placed
/// and is dropped from coupling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(default = "unit_series", alias = "radius")]
    pub radius_rsun: Series<f64>,
    #[serde(default = "unit_series", alias = "luminosity")]
    pub luminosity_lsun: Series<f64>,
    #[serde(default = "unset_position", alias = "position")]
    pub position_au: Series<[f64; 3]>,
}

fn unit_series() -> Series<f64> {
    Series::Scalar(1.0)
}

fn unset_position() -> Series<[f64; 3]> {
    Series::Sequence(Vec::new())
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            radius_rsun: unit_series(),
            luminosity_lsun: unit_series(),
            position_au: unset_position(),
        }
    }
}

impl SourceSpec {
    pub fn new(
        radius_rsun: impl Into<Series<f64>>,
        luminosity_lsun: impl Into<Series<f64>>,
        position_au: impl Into<Series<[f64; 3]>>,
    ) -> Self {
        Self {
            radius_rsun: radius_rsun.into(),
            luminosity_lsun: luminosity_lsun.into(),
            position_au: position_au.into(),
        }
    }

    /// A Sun-like source (1 R☉, 1 L☉) fixed at `position_au`.
    pub fn solar(position_au: [f64; 3]) -> Self {
        Self::new(1.0, 1.0, position_au)
    }

    /// True when no position data has been assigned.
    pub fn is_unset(&self) -> bool {
        self.position_au.is_empty_sequence()
    }
}
