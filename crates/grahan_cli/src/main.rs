mod scenario;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grahan_core::{CouplingConfig, SourceId, SourceRegistry};
use grahan_search::{
    CouplingReport, EclipseMethod, couple, couple_and_export, exact_occluded_fraction, lens_area,
};
use tracing::{Level, info};

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "grahan", about = "Grahan multi-source eclipse coupling CLI")]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Couple a scenario and write the boundary-condition file
    Couple {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Directory receiving the artifact
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        /// Override the sunflower sample count
        #[arg(long)]
        npoints: Option<usize>,
        /// Skip occultation and export unocculted flux
        #[arg(long)]
        no_eclipses: bool,
    },
    /// Couple a scenario and list its eclipses without writing anything
    Inspect {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Override the sunflower sample count
        #[arg(long)]
        npoints: Option<usize>,
    },
    /// Lens area of two disks and the occluded fraction of the first
    Lens {
        /// Radius of the occulted disk
        r1: f64,
        /// Radius of the occulting disk
        r2: f64,
        /// Center separation
        sep: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Couple {
            scenario,
            workdir,
            npoints,
            no_eclipses,
        } => {
            let (mut registry, mut config) = load(&scenario)?;
            if let Some(n) = npoints {
                config.npoints = n;
            }
            if no_eclipses {
                config.compute_eclipses = false;
            }
            let report = couple_and_export(&mut registry, &config, &workdir)
                .with_context(|| format!("coupling {}", scenario.display()))?;
            print_summary(&report);
            if let Some(path) = &report.artifact {
                println!("Wrote {}", path.display());
            }
        }

        Commands::Inspect { scenario, npoints } => {
            let (mut registry, mut config) = load(&scenario)?;
            if let Some(n) = npoints {
                config.npoints = n;
            }
            let report = couple(&mut registry, &config)
                .with_context(|| format!("coupling {}", scenario.display()))?;
            print_summary(&report);
            print_events(&report);
            print_sources(&registry, &report);
        }

        Commands::Lens { r1, r2, sep } => {
            if [r1, r2, sep].iter().any(|v| !v.is_finite() || *v < 0.0) {
                anyhow::bail!("radii and separation must be finite and non-negative");
            }
            println!("Lens area:         {:.10e}", lens_area(r1, r2, sep));
            println!(
                "Occluded fraction: {:.6}",
                exact_occluded_fraction(r1, r2, sep)
            );
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<(SourceRegistry, CouplingConfig)> {
    let scenario = Scenario::load(path)?;
    let registry = scenario
        .registry()
        .with_context(|| format!("registering sources from {}", path.display()))?;
    info!(
        path = %path.display(),
        slots = registry.capacity(),
        "loaded scenario"
    );
    Ok((registry, scenario.coupling))
}

fn print_summary(report: &CouplingReport) {
    println!("Timesteps:       {}", report.timesteps);
    println!("Active sources:  {}", join_ids(&report.active));
    if !report.dropped.is_empty() {
        println!("Dropped (unset): {}", join_ids(&report.dropped));
    }
    println!(
        "Eclipses:        {} simple, {} compound",
        report.simple_count(),
        report.compound_count()
    );
}

fn print_events(report: &CouplingReport) {
    if report.events.is_empty() {
        println!("No eclipses.");
        return;
    }
    println!();
    println!("{:>6}  {:>6}  {:>9}  {:<8}  Occulters", "Step", "Source", "Hidden", "Method");
    for ev in &report.events {
        let method = match ev.method {
            EclipseMethod::Exact => "exact",
            EclipseMethod::Sampled => "sampled",
        };
        println!(
            "{:>6}  {:>6}  {:>8.4}%  {:<8}  {}",
            ev.timestep,
            ev.target.index(),
            ev.occluded_fraction * 100.0,
            method,
            join_ids(&ev.occulters)
        );
    }
}

fn print_sources(registry: &SourceRegistry, report: &CouplingReport) {
    println!();
    println!("{:>6}  {:>14}  {:>14}  {:>14}", "Source", "Mean W/m^2", "Min W/m^2", "Max W/m^2");
    for id in &report.active {
        let Some(eph) = registry.ephemeris(*id) else {
            continue;
        };
        let flux = &eph.insolation_wm2;
        let mean = flux.iter().sum::<f64>() / flux.len() as f64;
        let min = flux.iter().copied().fold(f64::INFINITY, f64::min);
        let max = flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("{:>6}  {:>14.4}  {:>14.4}  {:>14.4}", id.index(), mean, min, max);
    }
}

fn join_ids(ids: &[SourceId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
