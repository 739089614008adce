//! JSON scenario files.
//!
//! ```json
//! {
//!   "nlights": 2,
//!   "timesteps": 12,
//!   "planet": { "position": [0, 0, 0], "north": [0, 0, 1] },
//!   "sources": [
//!     { "id": 0, "radius": 1.0, "luminosity": 1.0, "position": [1, 0, 0] },
//!     { "id": 1, "position": [[2, 0, 0], [2, 0.1, 0]] }
//!   ],
//!   "coupling": { "npoints": 5000 }
//! }
//! ```
//!
//! Every quantity is a scalar (a number, or a 3-array for vectors) or one
//! value per timestep. A source without `position` is registered unset.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use grahan_core::{CouplingConfig, CouplingError, PlanetTrack, SourceId, SourceRegistry, SourceSpec};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Provisioned source slots.
    pub nlights: usize,
    #[serde(default)]
    pub timesteps: Option<usize>,
    #[serde(default)]
    pub planet: PlanetTrack,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub coupling: CouplingConfig,
}

/// One `sources` entry: the slot id plus the source fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub id: usize,
    #[serde(flatten)]
    pub spec: SourceSpec,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Provision a registry and register the planet and every source.
    pub fn registry(&self) -> Result<SourceRegistry, CouplingError> {
        let mut registry = SourceRegistry::new(self.nlights, self.timesteps)?;
        registry.set_planet(self.planet.clone())?;
        for entry in &self.sources {
            registry.set_source(SourceId(entry.id), entry.spec.clone())?;
        }
        Ok(registry)
    }
}
