// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Criterion benchmarks for IDF scanning, parsing and serialization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use idf_lite_model::SchemaRegistry;
use idf_lite_workspace::{IdfFile, ObjectScanner, Workspace};
use std::fmt::Write;
use std::sync::Arc;

/// Synthetic input: `n` materials, one construction per pair, one zone with walls.
fn synthetic_idf(n: usize) -> String {
    let mut out = String::new();
    for i in 0..n {
        let _ = writeln!(
            out,
            "Material,\n  Material {i},  !- Name\n  Rough,\n  0.{i},\n  0.9,\n  1920,\n  790;\n"
        );
    }
    for i in 0..n / 2 {
        let _ = writeln!(
            out,
            "Construction,\n  Construction {i},\n  Material {},\n  Material {};\n",
            2 * i,
            2 * i + 1
        );
    }
    out.push_str("Zone,\n  Core;\n\n");
    for i in 0..n {
        let _ = writeln!(
            out,
            "BuildingSurface:Detailed,\n  Wall {i},\n  Wall,\n  Construction {},\n  Core,\n  Outdoors,\n  ,\n  SunExposed,\n  WindExposed,\n  AutoCalculate,\n  AutoCalculate,\n  0,0,3,\n  0,0,0,\n  10,0,0,\n  10,0,3;\n",
            i % (n / 2).max(1)
        );
    }
    out
}

fn bench_scan(c: &mut Criterion) {
    let text = synthetic_idf(2_000);
    c.bench_function("scan_objects_2000", |b| {
        b.iter(|| black_box(ObjectScanner::new(black_box(&text)).count()));
    });
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_idf(2_000);
    let registry = SchemaRegistry::energyplus();
    c.bench_function("parse_idf_2000", |b| {
        b.iter(|| black_box(IdfFile::parse(black_box(&text), &registry).map(|f| f.objects.len())));
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let text = synthetic_idf(500);
    let registry = Arc::new(SchemaRegistry::energyplus());
    c.bench_function("load_and_write_500", |b| {
        b.iter(|| {
            let loaded = Workspace::from_idf(black_box(&text), Arc::clone(&registry));
            black_box(loaded.map(|(ws, _)| ws.to_idf_string().len()))
        });
    });
}

criterion_group!(benches, bench_scan, bench_parse, bench_round_trip);
criterion_main!(benches);
