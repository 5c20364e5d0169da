//! End-to-end planning tests: configuration in, full layout out.

use approx::assert_relative_eq;
use beltlayout::diagnostics::EngineeringWarning;
use beltlayout::pair::{PairQuery, PulleyRecord, PulleyTag, resolve_pulley_pair, tag_pair};
use beltlayout::{
    BeltError, DriveConfig, GeometryError, PulleyRole, RatioSearch, ValidationIssue, plan_drive,
};
use nalgebra::Point2;

#[test]
fn default_config_plans_cleanly() {
    let layout = plan_drive(&DriveConfig::default()).unwrap();

    assert_eq!(layout.drive.tooth_count(), 24);
    assert_eq!(layout.driven.tooth_count(), 48);
    assert_relative_eq!(layout.actual_ratio(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(layout.speed_factor(), 0.5, epsilon = 1e-12);

    // 120-link belt around a 24T/48T pair lands at ~41.8 pitches,
    // inside the recommended 30..50 band.
    assert!(layout.center_in_pitches() > 30.0);
    assert!(layout.center_in_pitches() < 50.0);

    // The shared-angle spans run longer than the belt-length
    // approximation assumes, so the loop measures ~121.4 pitches: the
    // auto count lands on 121 and even enforcement bumps it to 122.
    assert_eq!(layout.link_count.raw, 121);
    assert_eq!(layout.link_count.adjusted, 122);
    assert!(layout.link_count.even_adjusted);
    assert_eq!(layout.frames.len(), 122);
    assert!(layout.pitch_deviation_pct().abs() < 1.0);

    // That bump is the only advisory the defaults produce.
    assert_eq!(layout.warnings.len(), 1);
    assert!(matches!(
        layout.warnings[0],
        EngineeringWarning::EvenCountAdjusted {
            raw: 121,
            adjusted: 122
        }
    ));
}

#[test]
fn radius_ordering_holds_for_every_pulley() {
    let layout = plan_drive(&DriveConfig::default()).unwrap();
    for spec in [&layout.drive, &layout.driven] {
        assert!(spec.root_radius() < spec.pitch_radius());
        assert!(spec.pitch_radius() < spec.tip_radius());
    }
    // Exact chord relation, not the circumference approximation:
    // 24 teeth of 12.7 pitch sit at r = 12.7 / (2 sin(pi/24)).
    assert_relative_eq!(layout.drive.pitch_radius(), 48.6492, epsilon = 1e-3);
}

#[test]
fn ratio_search_prefers_larger_pairs_among_exact_matches() {
    let config = DriveConfig::default().with_ratio_search(RatioSearch {
        target_ratio: 2.0,
        min_teeth: 12,
        max_teeth: 60,
        max_pulley_diameter: 260.0,
    });
    let layout = plan_drive(&config).unwrap();

    // (12,24) through (30,60) all hit the ratio exactly; the larger
    // pair wins the tie under the diameter ceiling.
    assert_eq!(layout.drive.tooth_count(), 30);
    assert_eq!(layout.driven.tooth_count(), 60);
    let solution = layout.ratio_solution.unwrap();
    assert_relative_eq!(solution.ratio_error, 0.0, epsilon = 1e-12);
}

#[test]
fn ratio_search_is_deterministic() {
    let config = DriveConfig::default().with_ratio_search(RatioSearch {
        target_ratio: 3.7,
        min_teeth: 10,
        max_teeth: 70,
        max_pulley_diameter: 300.0,
    });
    let first = plan_drive(&config).unwrap();
    let second = plan_drive(&config).unwrap();
    assert_eq!(first.drive.tooth_count(), second.drive.tooth_count());
    assert_eq!(first.driven.tooth_count(), second.driven.tooth_count());
}

#[test]
fn infeasible_ratio_search_is_reported() {
    let config = DriveConfig::default().with_ratio_search(RatioSearch {
        target_ratio: 2.0,
        min_teeth: 12,
        max_teeth: 60,
        max_pulley_diameter: 10.0,
    });
    assert!(matches!(
        plan_drive(&config),
        Err(BeltError::NoFeasiblePair)
    ));
}

#[test]
fn validation_reports_every_problem_at_once() {
    let config = DriveConfig::default()
        .with_tooth_counts(4, 48)
        .with_manual_center_distance(-5.0);
    match plan_drive(&config) {
        Err(BeltError::Validation(issues)) => {
            assert!(issues.contains(&ValidationIssue::ToothCountTooSmall { minimum: 9 }));
            assert!(issues.contains(&ValidationIssue::NonPositiveCenterDistance));
            assert_eq!(issues.len(), 2);
        },
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn overlapping_pulleys_are_rejected() {
    // 24T/48T tip radii sum to ~157 mm; 140 mm centers collide.
    let config = DriveConfig::default().with_manual_center_distance(140.0);
    assert!(matches!(
        plan_drive(&config),
        Err(BeltError::Geometry(GeometryError::PulleyOverlap { .. }))
    ));
}

#[test]
fn too_short_belt_cannot_span_the_pair() {
    let config = DriveConfig::default().with_belt_links(40);
    assert!(matches!(
        plan_drive(&config),
        Err(BeltError::Geometry(GeometryError::BeltLinksInfeasible {
            links: 40
        }))
    ));
}

#[test]
fn oversized_bore_is_rejected() {
    let config = DriveConfig::default().with_bore_diameters(100.0, 8.0);
    assert!(matches!(
        plan_drive(&config),
        Err(BeltError::Geometry(GeometryError::BoreExceedsHub {
            role: PulleyRole::Drive
        }))
    ));
}

#[test]
fn tight_center_distance_draws_a_warning() {
    // 20 pitches is below the recommended 30-pitch floor but still
    // clear of the tip circles.
    let config = DriveConfig::default().with_manual_center_distance(254.0);
    let layout = plan_drive(&config).unwrap();
    assert!(layout.warnings.iter().any(|w| matches!(
        w,
        EngineeringWarning::CenterDistanceOutsideRecommended { .. }
    )));
}

#[test]
fn small_drive_at_close_centers_warns_of_low_wrap() {
    let config = DriveConfig::default()
        .with_tooth_counts(10, 60)
        .with_manual_center_distance(190.0);
    let layout = plan_drive(&config).unwrap();
    assert!(layout.path.wrap_degrees(PulleyRole::Drive) < 120.0);
    assert!(layout.warnings.iter().any(|w| matches!(
        w,
        EngineeringWarning::LowWrapAngle {
            role: PulleyRole::Drive,
            ..
        }
    )));
}

#[test]
fn odd_link_count_is_bumped_and_noted() {
    let config = DriveConfig::default()
        .with_manual_link_count(121)
        .with_enforce_even_links(true);
    let layout = plan_drive(&config).unwrap();
    assert_eq!(layout.link_count.raw, 121);
    assert_eq!(layout.link_count.adjusted, 122);
    assert!(layout.link_count.even_adjusted);
    assert!(layout
        .warnings
        .iter()
        .any(|w| matches!(w, EngineeringWarning::EvenCountAdjusted { raw: 121, adjusted: 122 })));
}

#[test]
fn planned_layout_tags_resolve_back_to_a_pair() {
    let layout = plan_drive(&DriveConfig::default()).unwrap();
    let (drive_tag, driven_tag) = tag_pair(&layout, "bench-7");
    assert_eq!(drive_tag.pair_id, driven_tag.pair_id);
    assert_eq!(drive_tag.tooth_count, 24);
    assert_eq!(driven_tag.tooth_count, 48);

    let records = vec![
        PulleyRecord {
            name: "Pulley 24T".to_owned(),
            center: Point2::new(0.0, 0.0),
            attributes: drive_tag.to_attributes(),
        },
        PulleyRecord {
            name: "Pulley 48T".to_owned(),
            center: Point2::new(layout.center_distance, 0.0),
            attributes: driven_tag.to_attributes(),
        },
    ];
    let found = resolve_pulley_pair(&PairQuery {
        records: &records,
        ..PairQuery::default()
    })
    .unwrap();
    assert_eq!((found.drive, found.driven), (0, 1));

    let parsed = PulleyTag::from_attributes(&records[0].attributes).unwrap();
    assert_relative_eq!(parsed.belt_pitch, 12.7, epsilon = 1e-9);
}
