//! End-to-end checks of the design pipeline through the public API.

use forge_core::calculations::cut_list::PanelProfile;
use forge_core::calculations::door::DoorConfiguration;
use forge_core::calculations::geometry::ChamberInput;
use forge_core::calculations::specification::StaticPressure;
use forge_core::config::ForgeConfig;
use forge_core::drawing::{PageSize, ViewKind};
use forge_core::errors::ForgeError;
use forge_core::pipeline::build;

const ALL_CONFIGURATIONS: [DoorConfiguration; 3] = [
    DoorConfiguration::FrontOnly,
    DoorConfiguration::FrontAndRear,
    DoorConfiguration::SideLoading,
];

fn chamber(w: f64, h: f64, l: f64, ins: f64, doors: DoorConfiguration) -> ChamberInput {
    ChamberInput {
        internal_width_in: w,
        internal_height_in: h,
        internal_length_in: l,
        insulation_in: ins,
        door_configuration: doors,
    }
}

fn reference() -> ChamberInput {
    chamber(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly)
}

#[test]
fn reference_chamber_numbers() {
    let package = build(&reference(), &ForgeConfig::default()).unwrap();
    let spec = &package.specification;

    assert_eq!(package.geometry.external_width_in, 11.0);
    assert_eq!(package.geometry.external_height_in, 12.0);
    assert_eq!(package.geometry.external_length_in, 18.0);
    assert_eq!(package.geometry.volume_ci, 784.0);

    assert_eq!(spec.burner.hole_count, 44);
    assert!((spec.airflow.required_cfm - 65.333).abs() < 0.01);
    assert!((spec.airflow.recommended_cfm - spec.airflow.required_cfm * 1.25).abs() < 1e-9);
    assert_eq!(spec.airflow.static_pressure, StaticPressure::High);
    assert_eq!(spec.airflow.static_pressure.inches_wc(), 3.0);
}

#[test]
fn volume_of_exactly_500_is_high_pressure() {
    let package = build(
        &chamber(5.0, 10.0, 10.0, 2.0, DoorConfiguration::FrontOnly),
        &ForgeConfig::default(),
    )
    .unwrap();
    assert_eq!(package.geometry.volume_ci, 500.0);
    assert_eq!(package.specification.airflow.static_pressure, StaticPressure::High);
}

#[test]
fn zero_width_is_a_validation_error() {
    let err = build(
        &chamber(0.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly),
        &ForgeConfig::default(),
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, ForgeError::Validation { ref field, .. } if field == "internal_width_in"));
}

#[test]
fn burner_must_fit_the_chamber() {
    let config = ForgeConfig::default();

    // 448 ci: a 12" casting in an 8" chamber
    let short = build(&chamber(7.0, 8.0, 8.0, 2.0, DoorConfiguration::FrontOnly), &config).unwrap_err();
    assert!(matches!(short, ForgeError::Validation { ref field, .. } if field == "internal_length_in"));

    // Narrower than the burner housing plus clearance
    let narrow = build(&chamber(3.0, 6.0, 10.0, 1.0, DoorConfiguration::FrontOnly), &config).unwrap_err();
    assert!(matches!(narrow, ForgeError::Validation { ref field, .. } if field == "internal_width_in"));

    // Whatever is accepted carries a port that opens fully onto the ceiling
    for (w, h, l) in [(7.0, 8.0, 14.0), (3.5, 6.0, 10.0), (12.0, 5.0, 30.0), (5.0, 4.0, 48.0)] {
        let package = build(&chamber(w, h, l, 2.0, DoorConfiguration::FrontOnly), &config).unwrap();
        let burner = &package.specification.burner;
        let port = package.specification.cut_list.burner_port().unwrap();
        assert_eq!(port.width_in, burner.port_length_in);
        assert!(port.width_in > burner.length_in);
        assert!(port.height_in <= w);
        assert!(port.x_in >= 2.0 && port.right_in() <= 2.0 + l);
    }
}

#[test]
fn hole_count_never_decreases_with_volume() {
    let config = ForgeConfig::default();
    let mut previous = 0;
    for length in [12.0, 14.0, 16.0, 20.0, 24.0, 30.0, 40.0] {
        let package = build(&chamber(7.0, 8.0, length, 2.0, DoorConfiguration::FrontOnly), &config).unwrap();
        let holes = package.specification.burner.hole_count;
        assert!(holes >= 12);
        assert!(holes >= previous, "{holes} < {previous} at length {length}");
        previous = holes;
    }
}

#[test]
fn identical_inputs_give_identical_packages() {
    let config = ForgeConfig::default();
    for doors in ALL_CONFIGURATIONS {
        let input = chamber(8.0, 7.0, 18.0, 2.0, doors);
        assert_eq!(build(&input, &config).unwrap(), build(&input, &config).unwrap());
    }
}

#[test]
fn cutouts_stay_inside_their_panels() {
    let config = ForgeConfig::default();
    let sizes = [(7.0, 8.0, 14.0, 2.0), (6.0, 6.0, 12.0, 1.0), (10.0, 6.0, 24.0, 3.0)];

    for (w, h, l, ins) in sizes {
        for doors in ALL_CONFIGURATIONS {
            let package = build(&chamber(w, h, l, ins, doors), &config).unwrap();
            for panel in &package.specification.cut_list.panels {
                match &panel.profile {
                    PanelProfile::Closed { cutouts } => {
                        for (i, cutout) in cutouts.iter().enumerate() {
                            assert!(cutout.x_in > 0.0 && cutout.y_in > 0.0, "{} {doors:?}", panel.name());
                            assert!(cutout.right_in() < panel.width_in, "{} {doors:?}", panel.name());
                            assert!(cutout.top_in() < panel.height_in, "{} {doors:?}", panel.name());
                            assert!(cutouts[i + 1..].iter().all(|o| !cutout.overlaps(o)));
                        }
                    }
                    PanelProfile::OpenEdge { notch } => {
                        assert!(notch.x_in > 0.0);
                        assert!(notch.x_in + notch.width_in < panel.width_in);
                        assert!(notch.depth_in < panel.height_in);
                    }
                }
            }
        }
    }
}

#[test]
fn small_page_degrades_instead_of_failing() {
    let mut config = ForgeConfig::default();
    config.layout.page = PageSize {
        width_pt: 100.0,
        height_pt: 100.0,
    };

    let input = chamber(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontAndRear);
    let package = build(&input, &config).unwrap();

    let truncated = package.diagrams.views.iter().filter(|v| v.truncated).count();
    assert!(truncated > 0);
    assert_eq!(package.diagrams.degraded.len(), truncated);
    assert!(package
        .diagrams
        .degraded
        .iter()
        .all(|e| e.error_code() == "LAYOUT_DEGRADED" && e.is_recoverable()));

    // The guide still carries every drawing
    assert_eq!(package.document.diagrams().count(), 4);
}

#[test]
fn export_map_has_flat_scalars() {
    let package = build(&reference(), &ForgeConfig::default()).unwrap();
    let export = package.specification.export_map();

    assert_eq!(export["burner_holes"].as_u64(), Some(44));
    assert_eq!(export["volume_ci"].as_f64(), Some(784.0));
    assert_eq!(export["static_pressure_in_wc"].as_f64(), Some(3.0));
    assert!(export.values().all(|v| v.is_number() || v.is_string()));
}

#[test]
fn guide_references_only_drawn_views() {
    let config = ForgeConfig::default();
    for doors in ALL_CONFIGURATIONS {
        let package = build(&chamber(7.0, 8.0, 14.0, 2.0, doors), &config).unwrap();
        for kind in package.document.diagrams() {
            assert!(package.diagrams.view(kind).is_some(), "{kind:?} missing for {doors:?}");
        }
        assert!(package.diagrams.view(ViewKind::Front).is_some());
        assert!(package.diagrams.view(ViewKind::SideSection).is_some());
    }
}
