use criterion::{black_box, criterion_group, criterion_main, Criterion};

use notice_fetcher::maven::parse_dependency_list;
use notice_fetcher::scan::unify_paths;

fn dependency_list_output() -> String {
    let mut output = String::from("[INFO] The following files have been resolved:\n");
    for group in 0..20 {
        for artifact in 0..25 {
            output.push_str(&format!(
                "[INFO]    org.example{}:artifact-{}:jar:1.{}.0:compile -- module org.example{}.a{}\n",
                group, artifact, artifact, group, artifact
            ));
        }
    }
    output
}

fn class_dirs() -> Vec<String> {
    (0..50)
        .flat_map(|package| {
            (0..20).map(move |sub| format!("org/example/p{}/s{}/inner", package, sub))
        })
        .chain((0..50).map(|package| format!("org/example/p{}", package)))
        .collect()
}

fn bench_parse_dependency_list(c: &mut Criterion) {
    let output = dependency_list_output();
    let mut group = c.benchmark_group("maven");
    group.bench_function("parse-dependency-list-500", |b| {
        b.iter(|| parse_dependency_list(black_box(&output), "compile"))
    });
    group.finish();
}

fn bench_unify_paths(c: &mut Criterion) {
    let dirs = class_dirs();
    let mut group = c.benchmark_group("scan");
    group.bench_function("unify-paths-1050", |b| {
        b.iter(|| unify_paths(black_box(dirs.clone())))
    });
    group.finish();
}

criterion_group!(benches, bench_parse_dependency_list, bench_unify_paths);
criterion_main!(benches);
