//! Options for one coupling invocation.

use serde::{Deserialize, Serialize};

use crate::error::CouplingError;

/// Default sunflower sample count for compound eclipses.
pub const DEFAULT_NPOINTS: usize = 10_000;

/// Default boundary-condition artifact name.
pub const DEFAULT_OUTPUT_FILE: &str = "sources.dat";

/// Coupling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplingConfig {
    /// Run the pairwise scan and occultation stages. When false, every
    /// source is exported at its unocculted flux.
    pub compute_eclipses: bool,
    /// Sample points per disk for compound eclipses.
    pub npoints: usize,
    /// Sunflower boundary tuning, in [0, 2]. Larger values push more
    /// samples onto the disk rim.
    pub sunflower_alpha: f64,
    /// Artifact file name inside the working directory.
    pub output_file: String,
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            compute_eclipses: true,
            npoints: DEFAULT_NPOINTS,
            sunflower_alpha: 0.0,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl CouplingConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CouplingError> {
        if self.npoints == 0 {
            return Err(CouplingError::InvalidConfig(
                "npoints must be greater than zero",
            ));
        }
        if !(0.0..=2.0).contains(&self.sunflower_alpha) {
            return Err(CouplingError::InvalidConfig(
                "sunflower_alpha must be in [0, 2]",
            ));
        }
        if self.output_file.trim().is_empty() {
            return Err(CouplingError::InvalidConfig(
                "output_file must not be empty",
            ));
        }
        Ok(())
    }
}
