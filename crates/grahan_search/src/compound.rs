//! Resolution of clustered occultations.
//!
//! At a compound timestep the eclipse forest is split into connected
//! components. Within a component every parent, farthest first, is dimmed
//! by its occulter groups: a group with one member is solved in closed
//! form, a larger group is sampled as a union so that mutually overlapping
//! occulters are not subtracted twice. Group fractions are summed and the
//! total is capped at 1.

use grahan_core::CouplingError;
use tracing::debug;

use crate::event::{EclipseEvent, EclipseMethod};
use crate::exact::exact_occluded_fraction;
use crate::sky::{Disk, Sky};
use crate::sunflower::DiskSampler;
use crate::tree::EclipseForest;

/// Occulted fraction of every parent in `forest`, one event per parent.
pub fn resolve_compound(
    forest: &EclipseForest,
    sky: &Sky<'_>,
    sampler: &DiskSampler,
) -> Result<Vec<EclipseEvent>, CouplingError> {
    let t = forest.timestep();
    let mut events = Vec::new();

    for (index, component) in forest.components(sky).iter().enumerate() {
        debug!(
            timestep = t,
            component = index,
            parents = component.parents().len(),
            "resolving compound eclipse"
        );
        for &parent in component.parents() {
            let event = resolve_parent(component, sky, sampler, parent)?;
            events.push(event);
        }
    }
    Ok(events)
}

fn resolve_parent(
    forest: &EclipseForest,
    sky: &Sky<'_>,
    sampler: &DiskSampler,
    parent: usize,
) -> Result<EclipseEvent, CouplingError> {
    let t = forest.timestep();
    let target = sky.disk(parent, t);
    let mut total = 0.0;
    let mut method = EclipseMethod::Exact;
    let mut occulters = Vec::new();

    for group in forest.occulter_groups(parent) {
        let fraction = match group.as_slice() {
            [only] => exact_occluded_fraction(
                target.radius_rad,
                sky.disk(*only, t).radius_rad,
                sky.separation(parent, *only, t),
            ),
            members => {
                method = EclipseMethod::Sampled;
                let disks: Vec<Disk> = members.iter().map(|&m| sky.disk(m, t)).collect();
                sampler.hidden_fraction(&target, &disks)
            }
        };
        if !fraction.is_finite() {
            return Err(CouplingError::NonFinite {
                stage: "compound occultation",
                timestep: t,
            });
        }
        total += fraction;
        occulters.extend(group.iter().map(|&m| sky.id(m)));
    }

    Ok(EclipseEvent {
        timestep: t,
        target: sky.id(parent),
        occulters,
        occluded_fraction: total.min(1.0),
        method,
        compound: true,
    })
}
