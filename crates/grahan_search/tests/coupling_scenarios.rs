//! End-to-end coupling scenarios, from registry to exported artifact.

use std::fs;

use grahan_core::{
    CouplingConfig, CouplingError, PlanetTrack, SourceId, SourceRegistry, SourceSpec,
};
use grahan_search::{
    EclipseFlag, EclipseMethod, couple, couple_and_export, exact_occluded_fraction,
};
use grahan_frames::angular_separation;

const SOLAR_CONSTANT: f64 = 1361.1665;

fn registry(specs: &[SourceSpec], timesteps: Option<usize>) -> SourceRegistry {
    let mut reg = SourceRegistry::new(specs.len(), timesteps).unwrap();
    for (i, spec) in specs.iter().enumerate() {
        reg.set_source(SourceId(i), spec.clone()).unwrap();
    }
    reg
}

fn parse_rows(text: &str) -> Vec<Vec<f64>> {
    text.lines()
        .map(|l| l.split(' ').map(|v| v.parse().unwrap()).collect())
        .collect()
}

#[test]
fn single_star_exports_solar_constant() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry(&[SourceSpec::solar([1.0, 0.0, 0.0])], Some(4));
    let report = couple_and_export(&mut reg, &CouplingConfig::default(), dir.path()).unwrap();

    let path = report.artifact.clone().unwrap();
    assert_eq!(path, dir.path().join("sources.dat"));
    let rows = parse_rows(&fs::read_to_string(&path).unwrap());
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.len(), 3);
        assert!(row[0].abs() < 1e-12, "ra={}", row[0]);
        assert!(row[1].abs() < 1e-12, "dec={}", row[1]);
        assert!((row[2] - SOLAR_CONSTANT).abs() < 1e-9, "flux={}", row[2]);
    }
    assert!(report.events.is_empty());
}

#[test]
fn near_total_overlap_hides_farther_star() {
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::solar([1.0, 0.0, 0.0001]),
        ],
        Some(1),
    );
    let report = couple(&mut reg, &CouplingConfig::default()).unwrap();

    assert_eq!(report.events.len(), 1);
    let ev = &report.events[0];
    assert_eq!(ev.target, SourceId(1));
    assert_eq!(ev.method, EclipseMethod::Exact);
    assert!(!ev.compound);
    assert!(ev.occluded_fraction > 0.98, "fraction={}", ev.occluded_fraction);

    let b = reg.ephemeris(SourceId(1)).unwrap();
    let expected = b.unocculted_wm2[0] * (1.0 - ev.occluded_fraction);
    assert!((b.insolation_wm2[0] - expected).abs() < 1e-9);
    // The nearer star is untouched.
    let a = reg.ephemeris(SourceId(0)).unwrap();
    assert_eq!(a.insolation_wm2[0], a.unocculted_wm2[0]);
}

#[test]
fn nested_occulter_not_subtracted_twice() {
    // Far: large disk at 3 AU. Near: 1 AU, slightly off-axis but inside the
    // far disk. Middle: 2 AU on the same sightline as near, so its disk sits
    // wholly inside near's.
    let mut reg = registry(
        &[
            SourceSpec::new(6.0, 1.0, [3.0, 0.0, 0.0]),
            SourceSpec::solar([2.0, 0.0, 0.008]),
            SourceSpec::solar([1.0, 0.0, 0.004]),
        ],
        Some(1),
    );
    let report = couple(&mut reg, &CouplingConfig::default()).unwrap();
    assert_eq!(report.pairs.count(EclipseFlag::Compound), 3);

    let far = reg.ephemeris(SourceId(0)).unwrap();
    let near = reg.ephemeris(SourceId(2)).unwrap();
    let sep = angular_separation(far.ra_rad[0], far.dec_rad[0], near.ra_rad[0], near.dec_rad[0]);
    let near_only = exact_occluded_fraction(far.angular_radius(0), near.angular_radius(0), sep);

    let ev = report.events.iter().find(|e| e.target == SourceId(0)).unwrap();
    assert_eq!(ev.method, EclipseMethod::Sampled);
    assert_eq!(ev.occulters, vec![SourceId(1), SourceId(2)]);
    assert!(
        (ev.occluded_fraction - near_only).abs() < 0.01,
        "sampled={} exact={near_only}",
        ev.occluded_fraction
    );
    assert!((far.occluded_fraction[0] - near_only).abs() < 0.01);

    let middle = report.events.iter().find(|e| e.target == SourceId(1)).unwrap();
    assert!((middle.occluded_fraction - 1.0).abs() < 1e-12);
    assert!(reg.ephemeris(SourceId(1)).unwrap().insolation_wm2[0].abs() < 1e-9);
}

#[test]
fn disjoint_compound_clusters_resolved_independently() {
    let mut specs = Vec::new();
    for sign in [1.0, -1.0] {
        for d in [3.0, 2.0, 1.0] {
            specs.push(SourceSpec::solar([sign * d, 0.0, 0.0]));
        }
    }
    let mut reg = registry(&specs, Some(1));
    let report = couple(&mut reg, &CouplingConfig::default()).unwrap();

    assert_eq!(report.compound_count(), 4);
    assert_eq!(report.simple_count(), 0);
    for far in [SourceId(0), SourceId(3)] {
        let eph = reg.ephemeris(far).unwrap();
        assert!(eph.insolation_wm2[0].abs() < 1e-9, "source {far} still lit");
    }
    for near in [SourceId(2), SourceId(5)] {
        let eph = reg.ephemeris(near).unwrap();
        assert_eq!(eph.insolation_wm2[0], eph.unocculted_wm2[0]);
    }
}

#[test]
fn transit_over_time_rises_and_falls() {
    // B sweeps across A's disk over five timesteps.
    let track: Vec<[f64; 3]> = [-0.02, -0.002, 0.0, 0.002, 0.02]
        .iter()
        .map(|&y| [0.5, y, 0.0])
        .collect();
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::new(0.5, 0.1, track),
        ],
        None,
    );
    let report = couple(&mut reg, &CouplingConfig::default()).unwrap();
    assert_eq!(report.timesteps, 5);

    let a = reg.ephemeris(SourceId(0)).unwrap();
    assert_eq!(a.occluded_fraction[0], 0.0);
    assert_eq!(a.occluded_fraction[4], 0.0);
    assert!(a.occluded_fraction[1] > 0.0);
    assert!(a.occluded_fraction[2] > a.occluded_fraction[1]);
    assert!((a.occluded_fraction[1] - a.occluded_fraction[3]).abs() < 1e-9);
    assert_eq!(report.events_at(0).count(), 0);
    assert_eq!(report.events_at(2).count(), 1);
}

#[test]
fn source_on_planet_fails_without_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::new(1.0, 1.0, vec![[2.0, 0.0, 0.0], [0.0, 0.0, 0.0]]),
        ],
        None,
    );
    let err = couple_and_export(&mut reg, &CouplingConfig::default(), dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CouplingError::DegenerateGeometry {
            source_id: 1,
            timestep: 1,
            ..
        }
    ));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    assert!(reg.ephemeris(SourceId(0)).is_none());
}

#[test]
fn nan_position_is_fatal_without_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::new(1.0, 1.0, vec![[2.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0]]),
        ],
        None,
    );
    let err = couple_and_export(&mut reg, &CouplingConfig::default(), dir.path()).unwrap_err();
    assert!(
        matches!(err, CouplingError::NonFinite { timestep: 1, .. }),
        "{err:?}"
    );
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    assert!(reg.ephemeris(SourceId(0)).is_none());
}

#[test]
fn artifact_written_into_existing_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("bc")).unwrap();
    let mut reg = registry(&[SourceSpec::solar([1.0, 0.0, 0.0])], Some(2));
    let config = CouplingConfig {
        output_file: "bc/sources.dat".into(),
        ..Default::default()
    };
    let report = couple_and_export(&mut reg, &config, dir.path()).unwrap();

    let path = dir.path().join("bc").join("sources.dat");
    assert_eq!(report.artifact, Some(path.clone()));
    let rows = parse_rows(&fs::read_to_string(path).unwrap());
    assert_eq!(rows.len(), 2);
    assert_eq!(fs::read_dir(dir.path().join("bc")).unwrap().count(), 1);
}

#[test]
fn failed_run_keeps_previous_results() {
    let mut reg = registry(&[SourceSpec::solar([1.0, 0.0, 0.0])], Some(1));
    couple(&mut reg, &CouplingConfig::default()).unwrap();
    let before = reg.ephemeris(SourceId(0)).unwrap().clone();

    reg.set_planet(PlanetTrack::new([0.0; 3], [0.0; 3])).unwrap();
    assert!(couple(&mut reg, &CouplingConfig::default()).is_err());
    assert_eq!(reg.ephemeris(SourceId(0)), Some(&before));
}

#[test]
fn scalar_only_run_needs_timestep_count() {
    let mut reg = registry(&[SourceSpec::solar([1.0, 0.0, 0.0])], None);
    assert!(matches!(
        couple(&mut reg, &CouplingConfig::default()),
        Err(CouplingError::AmbiguousTimestepCount)
    ));
}

#[test]
fn unset_source_dropped_from_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = SourceRegistry::new(3, Some(2)).unwrap();
    reg.set_source(SourceId(0), SourceSpec::solar([1.0, 0.0, 0.0])).unwrap();
    reg.set_source(SourceId(2), SourceSpec::solar([0.0, 2.0, 0.0])).unwrap();

    let report = couple_and_export(&mut reg, &CouplingConfig::default(), dir.path()).unwrap();
    assert_eq!(report.dropped, vec![SourceId(1)]);
    assert_eq!(report.active, vec![SourceId(0), SourceId(2)]);

    let rows = parse_rows(&fs::read_to_string(report.artifact.unwrap()).unwrap());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == 6));
    assert!((rows[0][5] - SOLAR_CONSTANT / 4.0).abs() < 1e-9);
    assert!(reg.ephemeris(SourceId(1)).is_none());
}

#[test]
fn eclipses_disabled_exports_unocculted_flux() {
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::solar([2.0, 0.0, 0.0]),
        ],
        Some(1),
    );
    let config = CouplingConfig {
        compute_eclipses: false,
        ..Default::default()
    };
    let report = couple(&mut reg, &config).unwrap();
    assert!(report.events.is_empty());
    assert!(report.pairs.pairs().is_empty());
    let far = reg.ephemeris(SourceId(1)).unwrap();
    assert!((far.insolation_wm2[0] - SOLAR_CONSTANT / 4.0).abs() < 1e-9);
}

#[test]
fn custom_artifact_name_and_row_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut reg = registry(
        &[
            SourceSpec::solar([0.0, 1.0, 0.0]),
            SourceSpec::new(1.0, 4.0, [0.0, 0.0, 2.0]),
        ],
        Some(3),
    );
    let config = CouplingConfig {
        output_file: "stars.txt".into(),
        ..Default::default()
    };
    let report = couple_and_export(&mut reg, &config, dir.path()).unwrap();
    let text = fs::read_to_string(dir.path().join("stars.txt")).unwrap();
    assert!(!text.ends_with('\n'));
    assert_eq!(report.artifact, Some(dir.path().join("stars.txt")));

    let rows = parse_rows(&text);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert!((row[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(row[1].abs() < 1e-12);
        assert!((row[2] - SOLAR_CONSTANT).abs() < 1e-9);
        assert!((row[4] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((row[5] - SOLAR_CONSTANT).abs() < 1e-9);
    }
}

#[test]
fn pair_flags_agree_in_both_orders() {
    let mut reg = registry(
        &[
            SourceSpec::solar([1.0, 0.0, 0.0]),
            SourceSpec::solar([2.0, 0.0, 0.0]),
            SourceSpec::solar([0.0, 1.0, 0.0]),
        ],
        Some(1),
    );
    let report = couple(&mut reg, &CouplingConfig::default()).unwrap();
    for x in 0..3 {
        for y in 0..3 {
            if x == y {
                continue;
            }
            assert_eq!(
                report.pairs.flag(SourceId(x), SourceId(y), 0),
                report.pairs.flag(SourceId(y), SourceId(x), 0)
            );
        }
    }
    assert_eq!(report.pairs.flag(SourceId(0), SourceId(1), 0), Some(EclipseFlag::Simple));
    assert_eq!(report.pairs.flag(SourceId(0), SourceId(2), 0), Some(EclipseFlag::None));
}
