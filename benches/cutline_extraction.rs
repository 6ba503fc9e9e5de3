//! Benchmark for structure file scanning and cutline extraction.
//!
//! Uses a synthetic N x N rectangular mesh with three data keys, written
//! in the order simulators emit records (coordinates, header, nodes, labels).
//!
//! Run with: cargo bench --bench cutline_extraction

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fmt::Write;
use std::io::Cursor;
use tcad_reader::{Axis, StructureFile};

/// Generate a structure file for an `n` x `n` mesh on the unit square
fn generate_structure(n: usize) -> String {
    let mut content = String::new();
    let step = 1.0 / (n.max(2) - 1) as f64;

    for i in 0..n {
        for j in 0..n {
            let id = i * n + j + 1;
            let _ = writeln!(content, "c {} {} {} 0", id, i as f64 * step, j as f64 * step);
        }
    }

    content.push_str("s 1 2 3\n");
    for node in 0..n * n {
        let _ = writeln!(
            content,
            "n {} {} {} {}",
            node,
            node as f64 * 1e-3,
            1e15 + node as f64,
            300.0
        );
    }
    content.push_str("Q 1 0 Potential\nQ 2 0 \"Net Doping\"\n");
    content
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("structure_scan");

    for n in [32, 128, 256] {
        let content = generate_structure(n);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &content, |b, content| {
            b.iter(|| {
                let structure =
                    StructureFile::from_reader(Cursor::new(content.as_bytes()), "bench.str");
                black_box(structure.map(|s| s.mesh_index().len()).unwrap_or(0))
            })
        });
    }

    group.finish();
}

fn bench_cutline(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutline");

    for n in [32, 128, 256] {
        let content = generate_structure(n);
        let Ok(structure) = StructureFile::from_reader(Cursor::new(content.as_bytes()), "bench.str")
        else {
            continue;
        };

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("x", n), &structure, |b, structure| {
            b.iter(|| black_box(structure.cutline(Axis::X, black_box(0.5)).map(|t| t.height())))
        });
        group.bench_with_input(BenchmarkId::new("y", n), &structure, |b, structure| {
            b.iter(|| black_box(structure.cutline(Axis::Y, black_box(0.25)).map(|t| t.height())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_cutline);
criterion_main!(benches);
