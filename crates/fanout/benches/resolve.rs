//! Benchmarks for graph resolution and affected-set queries.
//!
//! These benchmarks measure:
//! - Upstream resolution over deep chains and wide fan-in graphs
//! - Affected-set queries against a resolved graph
//! - Scanning a generated tree from disk

// Benchmark code - performance of the benchmark setup is not critical
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fanout::{
    Analysis, DirectoryScan, FileId, GoScanner, ImportGraph, QueryOptions, ScannedPackage,
    SourceTree,
};

fn package(import_path: &str, imports: Vec<String>) -> DirectoryScan {
    DirectoryScan::new(
        import_path,
        vec![ScannedPackage {
            name: "pkg".to_string(),
            files: vec![FileId::new(format!("src/{import_path}/pkg.go"))],
            imports,
        }],
    )
}

/// `p0 -> p1 -> ... -> p{depth-1}`.
fn chain_tree(depth: usize) -> SourceTree {
    let directories = (0..depth)
        .map(|i| {
            let imports = if i + 1 < depth {
                vec![format!("p{}", i + 1)]
            } else {
                vec!["fmt".to_string()]
            };
            package(&format!("p{i}"), imports)
        })
        .collect();
    SourceTree::new("/bench/src", directories)
}

/// `width` consumers, each importing every one of `layers` shared libraries,
/// which import each other in a chain.
fn fan_in_tree(width: usize, layers: usize) -> SourceTree {
    let mut directories: Vec<DirectoryScan> = (0..layers)
        .map(|i| {
            let imports = if i + 1 < layers {
                vec![format!("lib{}", i + 1), "fmt".to_string()]
            } else {
                vec!["fmt".to_string()]
            };
            package(&format!("lib{i}"), imports)
        })
        .collect();
    directories.extend((0..width).map(|i| {
        package(
            &format!("cmd/tool{i}"),
            (0..layers).map(|l| format!("lib{l}")).collect(),
        )
    }));
    SourceTree::new("/bench/src", directories)
}

fn bench_resolve_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_chain");

    for depth in &[10, 100, 500] {
        let tree = chain_tree(*depth);
        group.throughput(Throughput::Elements(*depth as u64));
        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, _| {
            b.iter(|| {
                let graph = ImportGraph::build(tree.clone()).expect("build failed");
                black_box(Analysis::from_graph(graph))
            });
        });
    }

    group.finish();
}

fn bench_resolve_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_fan_in");

    for (width, layers) in &[(50, 5), (200, 10), (1000, 10)] {
        let tree = fan_in_tree(*width, *layers);
        let label = format!("{width}x{layers}");
        group.throughput(Throughput::Elements((width + layers) as u64));
        group.bench_with_input(BenchmarkId::new("packages", &label), &label, |b, _| {
            b.iter(|| {
                let graph = ImportGraph::build(tree.clone()).expect("build failed");
                black_box(Analysis::from_graph(graph))
            });
        });
    }

    group.finish();
}

fn bench_affected_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("affected_query");

    for width in &[50, 200, 1000] {
        let analysis = Analysis::from_tree(fan_in_tree(*width, 10)).expect("analysis failed");
        let changed = ["src/lib9/pkg.go", "src/lib0/pkg.go", "src/cmd/tool0/pkg.go"];
        group.throughput(Throughput::Elements(*width as u64));
        group.bench_with_input(BenchmarkId::new("consumers", width), width, |b, _| {
            b.iter(|| black_box(analysis.affected(black_box(changed), QueryOptions::default())));
        });
    }

    group.finish();
}

fn write_go_tree(root: &Path, count: usize) {
    for i in 0..count {
        let dir = root.join(format!("src/pkg{i}"));
        fs::create_dir_all(&dir).expect("failed to create dir");
        let import = if i + 1 < count {
            format!("import (\n\t\"fmt\"\n\t\"pkg{}\"\n)\n", i + 1)
        } else {
            "import \"fmt\"\n".to_string()
        };
        fs::write(
            dir.join(format!("pkg{i}.go")),
            format!("// Package pkg{i} is generated.\npackage pkg{i}\n\n{import}\nfunc F() {{ fmt.Println() }}\n"),
        )
        .expect("failed to write file");
    }
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(20);

    for count in &[50, 250] {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write_go_tree(dir.path(), *count);
        let scanner = GoScanner::new(dir.path(), Path::new("src"), BTreeSet::new());

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("files", count), count, |b, _| {
            b.iter(|| black_box(Analysis::scan(&scanner).expect("scan failed")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_chain,
    bench_resolve_fan_in,
    bench_affected_query,
    bench_scan
);
criterion_main!(benches);
