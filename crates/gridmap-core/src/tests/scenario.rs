//! End-to-end store-to-annotations scenarios on the fixture network.

use std::f64::consts::{PI, TAU};

use loxodrome::distance;

use super::*;

#[test]
fn corridor_lines_fan_out_into_symmetric_slots() {
    let network = network_fixture();
    let geodata = geodata_fixture();
    let composites =
        build_composite_data(&network, &geodata, &MapOptions::default()).unwrap();

    // Classes come out highest voltage first.
    assert_eq!(composites.len(), 2);
    assert_eq!(composites[0].nominal_v, 400.0);
    assert_eq!(composites[1].nominal_v, 225.0);

    let corridor = composites[0]
        .pair_groups
        .get(&SubstationPairKey::new("s1", "s2"))
        .unwrap();
    assert_eq!(corridor, &["l1", "l2", "l3"]);

    let annotations = &composites[0].annotations;
    assert_eq!(annotations["l1"].parallel_index, -1.0);
    assert_eq!(annotations["l2"].parallel_index, 0.0);
    assert_eq!(annotations["l3"].parallel_index, 1.0);

    // A 50 km boundary segment is far beyond the fork span, so nothing
    // shortens.
    for id in ["l1", "l2", "l3"] {
        assert!(annotations[id].routable);
        assert_eq!(annotations[id].proximity_factor_start, 1.0);
        assert_eq!(annotations[id].proximity_factor_end, 1.0);
    }

    let expected_angle =
        (map_angle(s1_position(), s2_position()).to_radians() + PI).rem_euclid(TAU);
    assert!((annotations["l1"].angle - expected_angle).abs() < 1e-12);
    assert!((annotations["l1"].angle_start - expected_angle).abs() < 1e-12);
}

#[test]
fn parallel_anchor_spacing_matches_the_configured_distance() {
    let network = network_fixture();
    let geodata = geodata_fixture();
    let options = MapOptions::default();
    let composites = build_composite_data(&network, &geodata, &options).unwrap();
    let annotations = &composites[0].annotations;

    let anchor = |id: &str| {
        let annotation = &annotations[id];
        let geometry = annotation.display_geometry(
            0.5,
            options.distance_between_lines,
            options.label_pixel_offset,
        );
        label_display_position(
            &annotation.positions,
            annotation.cumulative_distances.as_ref().unwrap(),
            0.5,
            FlowDirection::None,
            &geometry,
        )
        .unwrap()
        .unwrap()
        .position
    };

    let left = anchor("l1");
    let center = anchor("l2");
    let right = anchor("l3");

    assert!((distance(left, center) - 1_000.0).abs() < 10.0);
    assert!((distance(center, right) - 1_000.0).abs() < 10.0);
    assert!((distance(left, right) - 2_000.0).abs() < 10.0);
}

#[test]
fn unlocatable_endpoints_degrade_to_non_routable_annotations() {
    let network = network_fixture();
    let geodata = geodata_fixture();
    let composites =
        build_composite_data(&network, &geodata, &MapOptions::default()).unwrap();

    // l5 ends at s4, which has no stored position; the build must still
    // succeed and the line must carry neutral values.
    let annotation = &composites[0].annotations["l5"];
    assert!(!annotation.routable);
    assert_eq!(annotation.positions, vec![LonLat::ORIGIN, LonLat::ORIGIN]);
    assert_eq!(annotation.cumulative_distances, None);
    assert_eq!(annotation.parallel_index, 0.0);
    assert_eq!(annotation.angle, 0.0);
    assert_eq!(annotation.proximity_factor_start, 1.0);
}

#[test]
fn deleting_a_position_downgrades_the_corridor_until_restored() {
    let network = network_fixture();
    let mut geodata = geodata_fixture();
    let options = MapOptions::default();

    geodata.update_substation_positions(&["s2".to_string()], Vec::new());
    let composites = build_composite_data(&network, &geodata, &options).unwrap();
    assert!(!composites[0].annotations["l1"].routable);

    geodata.update_substation_positions(
        &["s2".to_string()],
        vec![SubstationPosition { id: "s2".to_string(), coordinate: s2_position() }],
    );
    let composites = build_composite_data(&network, &geodata, &options).unwrap();
    assert!(composites[0].annotations["l1"].routable);
}

#[test]
fn detailed_paths_reorient_to_start_at_side_one() {
    let network = network_fixture();
    let mut geodata = geodata_fixture();
    let line = network.line("l1").unwrap();

    // Stored path runs from the s2 end back to the s1 end.
    geodata.set_line_positions(vec![LinePosition {
        id: "l1".to_string(),
        coordinates: vec![
            LonLat::new(2.49, 48.29),
            LonLat::new(2.3, 48.2),
            LonLat::new(2.01, 48.01),
        ],
    }]);

    let detailed = geodata.line_positions(&network, line, true).unwrap();
    assert_eq!(detailed.len(), 3);
    assert_eq!(detailed[0], LonLat::new(2.01, 48.01));
    assert_eq!(detailed[2], LonLat::new(2.49, 48.29));

    // Without detailed routing the stored path is ignored entirely.
    let direct = geodata.line_positions(&network, line, false).unwrap();
    assert_eq!(direct, vec![s1_position(), s2_position()]);
}

#[test]
fn disabling_parallel_paths_pins_every_slot_to_zero() {
    let network = network_fixture();
    let geodata = geodata_fixture();
    let options = MapOptions { disable_parallel_paths: true, ..MapOptions::default() };
    let composites = build_composite_data(&network, &geodata, &options).unwrap();

    for composite in &composites {
        for annotation in composite.annotations.values() {
            assert_eq!(annotation.parallel_index, 0.0);
        }
    }
}

#[test]
fn voltage_level_ranks_stagger_forks_at_multi_level_substations() {
    let network = network_fixture();
    let geodata = geodata_fixture();
    let composites =
        build_composite_data(&network, &geodata, &MapOptions::default()).unwrap();

    // l4 leaves s1 from its 225 kV level, ranked below the 400 kV one.
    let annotation = &composites[1].annotations["l4"];
    assert_eq!(annotation.substation_index_start, 1);
    assert_eq!(annotation.substation_index_end, 0);

    // The corridor lines leave from the top-ranked level on both sides.
    let annotation = &composites[0].annotations["l1"];
    assert_eq!(annotation.substation_index_start, 0);
    assert_eq!(annotation.substation_index_end, 0);
}
