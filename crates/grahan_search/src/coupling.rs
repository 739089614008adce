//! End-to-end coupling run.
//!
//! Pipeline for one invocation:
//!   1. validate options and resolve the timestep count
//!   2. drop unset sources, derive every active source's ephemeris
//!   3. scan pairs; solve simple pairs exactly and compound timesteps
//!      through the eclipse forest
//!   4. attenuate fluxes, export the artifact, then publish the results
//!      back into the registry
//!
//! Any failure aborts before step 4 touches the filesystem or registry.

use std::path::{Path, PathBuf};

use grahan_core::{
    CouplingConfig, CouplingError, SourceEphemeris, SourceId, SourceRegistry, derive_ephemeris,
};
use tracing::{debug, info, warn};

use crate::compound::resolve_compound;
use crate::event::EclipseEvent;
use crate::exact::resolve_simple;
use crate::export::{format_boundary_rows, write_boundary_file};
use crate::pairs::{EclipseFlag, PairTable, scan_pairs};
use crate::sky::Sky;
use crate::sunflower::DiskSampler;
use crate::tree::EclipseForest;

/// Outcome of one coupling run.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingReport {
    pub timesteps: usize,
    /// Active sources, in export order.
    pub active: Vec<SourceId>,
    /// Unset slots skipped with a warning.
    pub dropped: Vec<SourceId>,
    /// Pairwise scan; empty when eclipses were not computed.
    pub pairs: PairTable,
    /// Every resolved occultation, ordered by timestep.
    pub events: Vec<EclipseEvent>,
    /// Artifact location, when one was written.
    pub artifact: Option<PathBuf>,
}

impl CouplingReport {
    /// Events at timestep `t`.
    pub fn events_at(&self, t: usize) -> impl Iterator<Item = &EclipseEvent> {
        self.events.iter().filter(move |e| e.timestep == t)
    }

    pub fn simple_count(&self) -> usize {
        self.events.iter().filter(|e| !e.compound).count()
    }

    pub fn compound_count(&self) -> usize {
        self.events.iter().filter(|e| e.compound).count()
    }
}

/// Run the coupling stages and store the derived data in `registry`.
pub fn couple(
    registry: &mut SourceRegistry,
    config: &CouplingConfig,
) -> Result<CouplingReport, CouplingError> {
    let (report, ephemerides) = run(registry, config)?;
    registry.store_ephemerides(ephemerides);
    log_summary(&report);
    Ok(report)
}

/// Run the coupling stages, write the artifact into `workdir`, and store
/// the derived data in `registry`.
pub fn couple_and_export(
    registry: &mut SourceRegistry,
    config: &CouplingConfig,
    workdir: &Path,
) -> Result<CouplingReport, CouplingError> {
    let (mut report, ephemerides) = run(registry, config)?;
    let text = format_boundary_rows(&ephemerides, report.timesteps);
    let path = write_boundary_file(workdir, &config.output_file, &text)?;
    report.artifact = Some(path);
    registry.store_ephemerides(ephemerides);
    log_summary(&report);
    Ok(report)
}

fn run(
    registry: &SourceRegistry,
    config: &CouplingConfig,
) -> Result<(CouplingReport, Vec<SourceEphemeris>), CouplingError> {
    config.validate()?;
    let n = registry.resolve_timesteps()?;

    let planet = registry.planet();
    let planet_pos = planet.position_au.broadcast(n, "planet position")?;
    let north = planet.north.broadcast(n, "planet north vector")?;

    let dropped = registry.unset_ids();
    for id in &dropped {
        warn!(source = id.index(), "light source has no position data; dropping it");
    }

    let mut ephemerides = registry
        .placed_sources()
        .map(|(id, spec)| derive_ephemeris(id, spec, &planet_pos, &north, n))
        .collect::<Result<Vec<_>, _>>()?;
    if ephemerides.is_empty() {
        return Err(CouplingError::Configuration(
            "no light source has position data".into(),
        ));
    }
    let active: Vec<SourceId> = ephemerides.iter().map(|e| e.id).collect();

    let (pairs, events) = if config.compute_eclipses && ephemerides.len() > 1 {
        resolve_eclipses(&ephemerides, n, config)?
    } else {
        (PairTable::default(), Vec::new())
    };

    for event in &events {
        if let Some(eph) = ephemerides.iter_mut().find(|e| e.id == event.target) {
            eph.occlude(event.timestep, event.occluded_fraction);
        }
    }
    for eph in &ephemerides {
        if let Some(t) = eph.insolation_wm2.iter().position(|v| !v.is_finite()) {
            return Err(CouplingError::NonFinite {
                stage: "insolation",
                timestep: t,
            });
        }
    }

    let report = CouplingReport {
        timesteps: n,
        active,
        dropped,
        pairs,
        events,
        artifact: None,
    };
    Ok((report, ephemerides))
}

fn resolve_eclipses(
    ephemerides: &[SourceEphemeris],
    n: usize,
    config: &CouplingConfig,
) -> Result<(PairTable, Vec<EclipseEvent>), CouplingError> {
    let sky = Sky::new(ephemerides);
    let pairs = scan_pairs(&sky, n)?;
    let compound = pairs.compound_timesteps();
    let sampler = if compound.is_empty() {
        DiskSampler::new(0, config.sunflower_alpha)
    } else {
        DiskSampler::new(config.npoints, config.sunflower_alpha)
    };

    let mut events = Vec::new();
    for t in 0..n {
        events.extend(resolve_simple(&pairs, &sky, t)?);
        if compound.binary_search(&t).is_ok() {
            let forest = EclipseForest::from_pairs(&pairs, &sky, t);
            debug!(
                timestep = t,
                pairs = pairs.flagged_at(t, EclipseFlag::Compound).count(),
                "compound eclipse"
            );
            events.extend(resolve_compound(&forest, &sky, &sampler)?);
        }
    }
    Ok((pairs, events))
}

fn log_summary(report: &CouplingReport) {
    info!(
        timesteps = report.timesteps,
        sources = report.active.len(),
        dropped = report.dropped.len(),
        simple = report.simple_count(),
        compound = report.compound_count(),
        artifact = ?report.artifact,
        "coupling complete"
    );
}
