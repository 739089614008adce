//! Pairwise eclipse detection.
//!
//! Algorithm:
//!   1. For every unordered pair of active sources and every timestep,
//!      compute the great-circle separation of their centers.
//!   2. Divide by the sum of their angular radii (the mean of their
//!      extents); a ratio below 1 means the disks overlap and the pair is
//!      flagged as a simple eclipse.
//!   3. At each timestep with more than one flagged pair, every flagged
//!      pair that shares a source with another flagged pair is promoted to
//!      compound. Those are resolved together by the eclipse forest; the
//!      rest stay simple and are solved in closed form.
//!
//! Cost is O(N·K²) for K sources over N timesteps.

use grahan_core::{CouplingError, SourceId};

use crate::sky::Sky;

/// Per-timestep overlap state of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EclipseFlag {
    #[default]
    None,
    /// The only occultation involving either source at this timestep.
    Simple,
    /// Part of a chain or cluster of three or more overlapping sources.
    Compound,
}

/// An unordered pair of active sources and its per-timestep overlap state.
#[derive(Debug, Clone, PartialEq)]
pub struct EclipsePair {
    /// Slot of the lower-id member.
    pub a: usize,
    /// Slot of the higher-id member.
    pub b: usize,
    pub ids: (SourceId, SourceId),
    /// Center separation, radians.
    pub separation_rad: Vec<f64>,
    /// Separation over the sum of angular radii; < 1 means overlap.
    pub relative_separation: Vec<f64>,
    pub flags: Vec<EclipseFlag>,
}

/// All pairs of one coupling run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairTable {
    timesteps: usize,
    pairs: Vec<EclipsePair>,
}

impl PairTable {
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    pub fn pairs(&self) -> &[EclipsePair] {
        &self.pairs
    }

    /// Flag for the pair of source ids `x`, `y` at `t`, in either order.
    pub fn flag(&self, x: SourceId, y: SourceId, t: usize) -> Option<EclipseFlag> {
        self.pairs
            .iter()
            .find(|p| p.ids == (x, y) || p.ids == (y, x))
            .map(|p| p.flags[t])
    }

    /// Pairs flagged `flag` at `t`.
    pub fn flagged_at(&self, t: usize, flag: EclipseFlag) -> impl Iterator<Item = &EclipsePair> {
        self.pairs.iter().filter(move |p| p.flags[t] == flag)
    }

    /// Number of pairs flagged `flag` over the whole run.
    pub fn count(&self, flag: EclipseFlag) -> usize {
        self.pairs
            .iter()
            .map(|p| p.flags.iter().filter(|f| **f == flag).count())
            .sum()
    }

    /// Timesteps where any pair is compound.
    pub fn compound_timesteps(&self) -> Vec<usize> {
        (0..self.timesteps)
            .filter(|&t| self.pairs.iter().any(|p| p.flags[t] == EclipseFlag::Compound))
            .collect()
    }
}

/// Scan every pair of sources at every timestep and classify overlaps.
pub fn scan_pairs(sky: &Sky<'_>, timesteps: usize) -> Result<PairTable, CouplingError> {
    let k = sky.len();
    let mut pairs = Vec::with_capacity(k * k.saturating_sub(1) / 2);

    for a in 0..k {
        for b in (a + 1)..k {
            let mut pair = EclipsePair {
                a,
                b,
                ids: (sky.id(a), sky.id(b)),
                separation_rad: Vec::with_capacity(timesteps),
                relative_separation: Vec::with_capacity(timesteps),
                flags: vec![EclipseFlag::None; timesteps],
            };
            for t in 0..timesteps {
                let sep = sky.separation(a, b, t);
                if !sep.is_finite() {
                    return Err(CouplingError::NonFinite {
                        stage: "pairwise separation",
                        timestep: t,
                    });
                }
                let reach = sky.disk(a, t).radius_rad + sky.disk(b, t).radius_rad;
                // Two point sources never overlap.
                let rel = if reach > 0.0 { sep / reach } else { f64::INFINITY };
                if rel < 1.0 {
                    pair.flags[t] = EclipseFlag::Simple;
                }
                pair.separation_rad.push(sep);
                pair.relative_separation.push(rel);
            }
            pairs.push(pair);
        }
    }

    let mut table = PairTable { timesteps, pairs };
    for t in 0..timesteps {
        promote_compound(&mut table, k, t);
    }
    Ok(table)
}

/// Promote pairs at `t` that share a source with another flagged pair.
fn promote_compound(table: &mut PairTable, sources: usize, t: usize) {
    let mut hits = vec![0usize; sources];
    let mut flagged = 0usize;
    for p in table.pairs.iter().filter(|p| p.flags[t] != EclipseFlag::None) {
        hits[p.a] += 1;
        hits[p.b] += 1;
        flagged += 1;
    }
    if flagged < 2 {
        return;
    }
    for p in table.pairs.iter_mut() {
        if p.flags[t] != EclipseFlag::None && (hits[p.a] > 1 || hits[p.b] > 1) {
            p.flags[t] = EclipseFlag::Compound;
        }
    }
}
