//! Record of one resolved occultation.

use grahan_core::SourceId;

/// How an occulted fraction was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseMethod {
    /// Closed-form lens area for each occulter group.
    Exact,
    /// At least one group needed sunflower sampling.
    Sampled,
}

/// One source's occultation at one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipseEvent {
    pub timestep: usize,
    /// The farther, occulted source.
    pub target: SourceId,
    /// Nearer sources covering it, farthest first.
    pub occulters: Vec<SourceId>,
    /// Share of the target's disk hidden, [0, 1].
    pub occluded_fraction: f64,
    pub method: EclipseMethod,
    /// Resolved through the eclipse forest rather than as a lone pair.
    pub compound: bool,
}
