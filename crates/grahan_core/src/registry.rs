//! Fixed-capacity source registry.
//!
//! Sources live in an arena of slots indexed by [`SourceId`]. The run's
//! capacity is fixed at construction, and every per-timestep sequence is
//! validated against the run's timestep count when it is registered, so
//! shape problems surface at the call that introduced them rather than
//! deep inside coupling.
//!
//! The timestep count is either given explicitly at construction or fixed
//! by the first non-empty sequence registered (planet or source).

use tracing::debug;

use crate::ephemeris::SourceEphemeris;
use crate::error::CouplingError;
use crate::series::Series;
use crate::source::{PlanetTrack, SourceId, SourceSpec};

#[derive(Debug, Clone, Default)]
struct SourceSlot {
    spec: Option<SourceSpec>,
    ephemeris: Option<SourceEphemeris>,
}

/// Planet plus provisioned light sources for one coupling run.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    timesteps: Option<usize>,
    planet: PlanetTrack,
    slots: Vec<SourceSlot>,
}

impl SourceRegistry {
    /// Provision `capacity` source slots.
    ///
    /// `timesteps` is required when every coordinate will be scalar.
    pub fn new(capacity: usize, timesteps: Option<usize>) -> Result<Self, CouplingError> {
        if capacity == 0 {
            return Err(CouplingError::Configuration(
                "a run needs at least one light source slot".into(),
            ));
        }
        if timesteps == Some(0) {
            return Err(CouplingError::Configuration(
                "timestep count must be greater than zero".into(),
            ));
        }
        Ok(Self {
            timesteps,
            planet: PlanetTrack::default(),
            slots: vec![SourceSlot::default(); capacity],
        })
    }

    /// Number of provisioned source slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Timestep count, if known yet.
    pub fn timesteps(&self) -> Option<usize> {
        self.timesteps
    }

    /// Timestep count for coupling.
    pub fn resolve_timesteps(&self) -> Result<usize, CouplingError> {
        self.timesteps.ok_or(CouplingError::AmbiguousTimestepCount)
    }

    pub fn planet(&self) -> &PlanetTrack {
        &self.planet
    }

    /// Replace the planet track.
    pub fn set_planet(&mut self, planet: PlanetTrack) -> Result<(), CouplingError> {
        let mut lens = Vec::with_capacity(2);
        collect_len(&mut lens, "planet position", &planet.position_au)?;
        collect_len(&mut lens, "planet north vector", &planet.north)?;
        self.lock_timesteps(&lens)?;
        self.planet = planet;
        Ok(())
    }

    /// Register (or replace) the source in slot `id`.
    ///
    /// An unset source (empty position sequence) is accepted here and
    /// dropped with a warning at coupling time.
    pub fn set_source(&mut self, id: SourceId, spec: SourceSpec) -> Result<(), CouplingError> {
        if id.index() >= self.slots.len() {
            return Err(CouplingError::Configuration(format!(
                "source {id} exceeds the {} source(s) this run was provisioned for",
                self.slots.len()
            )));
        }

        let mut lens = Vec::with_capacity(3);
        if !spec.is_unset() {
            collect_len(&mut lens, &format!("source {id} position"), &spec.position_au)?;
        }
        collect_len(&mut lens, &format!("source {id} radius"), &spec.radius_rsun)?;
        collect_len(&mut lens, &format!("source {id} luminosity"), &spec.luminosity_lsun)?;
        for (what, series) in [("radius", &spec.radius_rsun), ("luminosity", &spec.luminosity_lsun)] {
            if series.values().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(CouplingError::Configuration(format!(
                    "source {id} {what} must be finite and non-negative"
                )));
            }
        }
        self.lock_timesteps(&lens)?;

        debug!(source = id.index(), unset = spec.is_unset(), "registered light source");
        let slot = &mut self.slots[id.index()];
        slot.spec = Some(spec);
        slot.ephemeris = None;
        Ok(())
    }

    /// Source registered in slot `id`, if any.
    pub fn source(&self, id: SourceId) -> Option<&SourceSpec> {
        self.slots.get(id.index()).and_then(|s| s.spec.as_ref())
    }

    /// Derived data for `id` from the last successful coupling run.
    pub fn ephemeris(&self, id: SourceId) -> Option<&SourceEphemeris> {
        self.slots.get(id.index()).and_then(|s| s.ephemeris.as_ref())
    }

    /// Sources with position data, in id order.
    pub fn placed_sources(&self) -> impl Iterator<Item = (SourceId, &SourceSpec)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match &slot.spec {
            Some(spec) if !spec.is_unset() => Some((SourceId(i), spec)),
            _ => None,
        })
    }

    /// Slots without position data, in id order.
    pub fn unset_ids(&self) -> Vec<SourceId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.spec.as_ref().is_none_or(SourceSpec::is_unset))
            .map(|(i, _)| SourceId(i))
            .collect()
    }

    /// Install the derived data of a completed run, clearing stale entries.
    pub fn store_ephemerides(&mut self, ephemerides: Vec<SourceEphemeris>) {
        for slot in &mut self.slots {
            slot.ephemeris = None;
        }
        for eph in ephemerides {
            let index = eph.id.index();
            if let Some(slot) = self.slots.get_mut(index) {
                slot.ephemeris = Some(eph);
            }
        }
    }

    fn lock_timesteps(&mut self, lens: &[(String, usize)]) -> Result<(), CouplingError> {
        let mut expected = self.timesteps;
        for (what, len) in lens {
            match expected {
                Some(n) if n != *len => {
                    return Err(CouplingError::ShapeMismatch {
                        what: what.clone(),
                        expected: n,
                        found: *len,
                    });
                }
                Some(_) => {}
                None => expected = Some(*len),
            }
        }
        self.timesteps = expected;
        Ok(())
    }
}

fn collect_len<T: Clone>(
    lens: &mut Vec<(String, usize)>,
    what: &str,
    series: &Series<T>,
) -> Result<(), CouplingError> {
    match series.sequence_len() {
        Some(0) => Err(CouplingError::Configuration(format!(
            "{what} is an empty sequence"
        ))),
        Some(len) => {
            lens.push((what.to_string(), len));
            Ok(())
        }
        None => Ok(()),
    }
}
