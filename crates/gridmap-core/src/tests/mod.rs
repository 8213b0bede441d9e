//! Crate-level tests exercising the store, grouping and placement pipeline
//! together, on a small fixture network.

use crate::*;

mod scenario;

fn substation(id: &str, levels: &[(&str, f64)]) -> Substation {
    Substation {
        id: id.to_string(),
        voltage_levels: levels
            .iter()
            .map(|(level_id, nominal_v)| VoltageLevel {
                id: level_id.to_string(),
                substation_id: id.to_string(),
                nominal_v: *nominal_v,
            })
            .collect(),
    }
}

fn line(id: &str, voltage_level_id1: &str, voltage_level_id2: &str) -> Line {
    Line {
        id: id.to_string(),
        voltage_level_id1: voltage_level_id1.to_string(),
        voltage_level_id2: voltage_level_id2.to_string(),
        connected1: true,
        connected2: true,
        p1: Some(100.0),
        p2: Some(-98.5),
        i1: Some(200.0),
        i2: Some(205.0),
        permanent_limit1: Some(1_000.0),
        permanent_limit2: Some(1_000.0),
        operating_status: OperatingStatus::InOperation,
    }
}

/// Three 400 kV lines on the s1-s2 corridor, one 225 kV line, and one line
/// to a substation with no stored position.
fn network_fixture() -> Network {
    Network::new(
        vec![
            substation("s1", &[("vl1", 400.0), ("vl1b", 225.0)]),
            substation("s2", &[("vl2", 400.0)]),
            substation("s3", &[("vl3", 225.0)]),
            substation("s4", &[("vl4", 400.0)]),
        ],
        vec![
            line("l1", "vl1", "vl2"),
            line("l2", "vl1", "vl2"),
            line("l3", "vl1", "vl2"),
            line("l4", "vl1b", "vl3"),
            line("l5", "vl1", "vl4"),
        ],
    )
}

fn s1_position() -> LonLat {
    LonLat::new(2.0, 48.0)
}

fn s2_position() -> LonLat {
    LonLat::new(2.5, 48.3)
}

/// Positions for s1 through s3; s4 stays unlocated on purpose.
fn geodata_fixture() -> GeoData {
    let mut geodata = GeoData::new();
    geodata.set_substation_positions(vec![
        SubstationPosition { id: "s1".to_string(), coordinate: s1_position() },
        SubstationPosition { id: "s2".to_string(), coordinate: s2_position() },
        SubstationPosition { id: "s3".to_string(), coordinate: LonLat::new(3.0, 47.9) },
    ]);
    geodata
}
