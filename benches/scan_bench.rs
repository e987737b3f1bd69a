//! Benchmarks for project scanning and cache lookups.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use std::hint::black_box;
use std::sync::Arc;
use svcmap::{AnalysisCache, ProjectAnalyzer, TreeScanner};
use tempfile::TempDir;

/// Create a project with `num_services` HTTP and RPC services plus a vendored tree.
fn create_project(num_services: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(
        root.join("go.mod"),
        "module bench\n\ngo 1.21\n\nrequire (\n\tgithub.com/zeromicro/go-zero v1.6.0\n\tgoogle.golang.org/grpc v1.59.0\n)\n",
    )
    .unwrap();

    for i in 0..num_services {
        let api_dir = root.join(format!("service/svc{i}/api"));
        let rpc_dir = root.join(format!("service/svc{i}/rpc"));
        fs::create_dir_all(api_dir.join("etc")).unwrap();
        fs::create_dir_all(&rpc_dir).unwrap();

        fs::write(
            api_dir.join(format!("svc{i}.api")),
            format!(
                "type Req{i} {{}}\n\nservice svc{i}-api {{\n  @handler Get{i}\n  get /svc{i}/:id (Req{i}) returns (Req{i})\n\n  @handler Put{i}\n  put /svc{i}/:id (Req{i})\n}}\n"
            ),
        )
        .unwrap();
        fs::write(
            rpc_dir.join(format!("svc{i}.proto")),
            format!("service Svc{i} {{\n  rpc Get(Req) returns (Resp);\n  rpc Watch(Req) returns (stream Resp);\n}}\n"),
        )
        .unwrap();
        fs::write(api_dir.join("etc/config.yaml"), "Name: svc\n").unwrap();

        let vendored = root.join(format!("vendor/lib{i}"));
        fs::create_dir_all(&vendored).unwrap();
        fs::write(vendored.join("ignored.api"), "service ignored-api {}\n").unwrap();
    }

    temp_dir
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_scan");

    for num_services in [4, 16, 64] {
        let project = create_project(num_services);
        let scanner = TreeScanner::default();

        group.throughput(Throughput::Elements((num_services * 2) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_services),
            &project,
            |b, project| b.iter(|| black_box(scanner.scan(project.path()).unwrap())),
        );
    }

    group.finish();
}

fn bench_cached_analyze(c: &mut Criterion) {
    let project = create_project(16);
    let analyzer = ProjectAnalyzer::new(TreeScanner::default(), Arc::new(AnalysisCache::default()));
    analyzer.analyze(project.path()).unwrap();

    c.bench_function("cached_analyze", |b| {
        b.iter(|| black_box(analyzer.analyze(project.path()).unwrap()))
    });
}

criterion_group!(benches, bench_scan, bench_cached_analyze);
criterion_main!(benches);
