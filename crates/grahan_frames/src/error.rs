//! Error types for frame conversions.

use thiserror::Error;

/// Errors from the apparent equatorial transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FrameError {
    /// Source coincides with the observer.
    #[error("source is at zero distance from the planet")]
    ZeroDistance,
    /// North-pole reference vector has zero length.
    #[error("north vector has zero length")]
    ZeroNorthVector,
    /// An input coordinate was NaN or infinite.
    #[error("non-finite coordinate")]
    NonFinite,
}
