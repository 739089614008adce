//! Error type shared by every coupling stage.

use grahan_frames::FrameError;
use thiserror::Error;

/// Errors that abort a coupling invocation.
///
/// Nothing is exported and the registry is left untouched when any of
/// these is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CouplingError {
    /// A source sits on top of the planet, or the planet's north vector
    /// has zero length.
    #[error("degenerate geometry for source {source_id} at timestep {timestep}: {reason}")]
    DegenerateGeometry {
        source_id: usize,
        timestep: usize,
        reason: FrameError,
    },
    /// Registration outside what the run was provisioned for.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A coupling option is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    /// Every entity is scalar and no explicit timestep count was given.
    #[error("all coordinates are scalars and no timestep count was supplied")]
    AmbiguousTimestepCount,
    /// A per-timestep sequence disagrees with the run's timestep count.
    #[error("{what} has {found} entries, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    /// NaN or infinity surfaced in a geometric or photometric stage.
    #[error("non-finite value in {stage} at timestep {timestep}")]
    NonFinite { stage: &'static str, timestep: usize },
    /// Writing the boundary-condition artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CouplingError {
    /// Map a frame failure for `source_id` at `timestep` onto the coupling error.
    pub fn from_frame(source_id: usize, timestep: usize, err: FrameError) -> Self {
        match err {
            FrameError::NonFinite => Self::NonFinite {
                stage: "coordinates",
                timestep,
            },
            reason => Self::DegenerateGeometry {
                source_id,
                timestep,
                reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_map_to_geometry_or_nonfinite() {
        assert!(matches!(
            CouplingError::from_frame(2, 7, FrameError::ZeroDistance),
            CouplingError::DegenerateGeometry {
                source_id: 2,
                timestep: 7,
                reason: FrameError::ZeroDistance
            }
        ));
        assert!(matches!(
            CouplingError::from_frame(0, 3, FrameError::NonFinite),
            CouplingError::NonFinite { timestep: 3, .. }
        ));
    }

    #[test]
    fn display_names_the_source() {
        let e = CouplingError::from_frame(4, 1, FrameError::ZeroNorthVector);
        let msg = e.to_string();
        assert!(msg.contains("source 4"), "{msg}");
        assert!(msg.contains("north vector"), "{msg}");
    }
}
