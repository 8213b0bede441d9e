use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gridmap_core::{
    FlowDirection, GeoData, Line, LineDisplayGeometry, LonLat, MapOptions, Network,
    OperatingStatus, Substation, SubstationPosition, VoltageLevel, build_composite_data,
    label_display_position, line_distances,
};
use std::hint::black_box;
use std::time::Duration;

/// A gently wiggling northeast-bound path, the shape detailed line routes
/// tend to have.
fn polyline(points: usize) -> Vec<LonLat> {
    (0..points)
        .map(|i| {
            let t = i as f64;
            LonLat::new(0.01 * t, 45.0 + 0.004 * t + 0.002 * (t * 0.7).sin())
        })
        .collect()
}

fn substation(id: String, voltage_level_id: String) -> Substation {
    Substation {
        id: id.clone(),
        voltage_levels: vec![VoltageLevel {
            id: voltage_level_id,
            substation_id: id,
            nominal_v: 400.0,
        }],
    }
}

fn line(id: String, voltage_level_id1: String, voltage_level_id2: String) -> Line {
    Line {
        id,
        voltage_level_id1,
        voltage_level_id2,
        connected1: true,
        connected2: true,
        p1: Some(120.0),
        p2: Some(-118.0),
        i1: Some(300.0),
        i2: Some(305.0),
        permanent_limit1: Some(1_000.0),
        permanent_limit2: Some(1_000.0),
        operating_status: OperatingStatus::InOperation,
    }
}

/// A chain of substations with several parallel lines per consecutive pair.
fn chain_network(substations: usize, lines_per_corridor: usize) -> (Network, GeoData) {
    let stations: Vec<Substation> =
        (0..substations).map(|i| substation(format!("s{i}"), format!("vl{i}"))).collect();

    let mut lines = Vec::new();
    for i in 0..substations.saturating_sub(1) {
        for k in 0..lines_per_corridor {
            lines.push(line(format!("l{i}_{k}"), format!("vl{i}"), format!("vl{}", i + 1)));
        }
    }
    let network = Network::new(stations, lines);

    let mut geodata = GeoData::new();
    geodata.set_substation_positions(
        (0..substations)
            .map(|i| SubstationPosition {
                id: format!("s{i}"),
                coordinate: LonLat::new(0.2 * i as f64, 45.0 + 0.05 * i as f64),
            })
            .collect(),
    );
    (network, geodata)
}

fn bench_line_distances(c: &mut Criterion) {
    let mut group = c.benchmark_group("geodata");

    for points in [50usize, 200, 400] {
        let path = polyline(points);
        group.bench_with_input(
            BenchmarkId::new("line_distances", points),
            &path,
            |b, path| b.iter(|| line_distances(black_box(path))),
        );
    }

    group.finish();
}

fn bench_label_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("geodata");
    group.measurement_time(Duration::from_secs(10));

    let positions = polyline(200);
    let cumulative = line_distances(&positions).unwrap();
    let geometry = LineDisplayGeometry {
        parallel_index: 2.0,
        line_angle_deg: 250.0,
        endpoint_angle_deg: 255.0,
        distance_between_lines: 1_000.0,
        proximity_factor: 0.8,
        label_offset_px: 20.0,
    };

    group.bench_function("label_display_position_32_anchors", |b| {
        b.iter(|| {
            for k in 0..32 {
                let fraction = k as f64 / 31.0;
                let placed = label_display_position(
                    black_box(&positions),
                    &cumulative,
                    fraction,
                    FlowDirection::FromSide1ToSide2,
                    &geometry,
                );
                black_box(placed.ok());
            }
        })
    });

    group.finish();
}

fn bench_build_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("geodata");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("chain_10x4", 10usize, 4usize), ("chain_40x4", 40, 4)];
    for (name, substations, per_corridor) in cases {
        let (network, geodata) = chain_network(substations, per_corridor);
        let options = MapOptions::default();
        group.bench_with_input(
            BenchmarkId::new("build_composite_data", name),
            &(network, geodata),
            |b, (network, geodata)| {
                b.iter(|| {
                    let composites =
                        build_composite_data(black_box(network), geodata, &options);
                    black_box(composites.map(|c| c.len()).unwrap_or(0));
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_line_distances, bench_label_placement, bench_build_composite);
criterion_main!(benches);
