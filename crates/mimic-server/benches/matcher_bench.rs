use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mimic_server::mapping::{
    find_match, MappingDefinition, MappingStore, RequestDescriptor, RequestMethod,
    RequestPattern, ResponseSpec,
};

fn create_store(count: usize, with_headers: bool) -> MappingStore {
    let store = MappingStore::new();
    for i in 0..count {
        let mut pattern =
            RequestPattern::new(RequestMethod::Get, format!("/api/v1/endpoint{i}")).unwrap();
        if with_headers {
            pattern = pattern
                .with_header("Accept", "application/json")
                .with_header("X-Tenant", format!("tenant-{i}"));
        }
        store.insert(MappingDefinition::new(
            pattern,
            ResponseSpec::new(200)
                .unwrap()
                .with_header("Content-Type", "application/json")
                .unwrap()
                .with_body(format!(r#"{{"id": {i}}}"#)),
        ));
    }
    store
}

fn bench_find_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_match");

    for mapping_count in [10, 100, 1000].iter() {
        let store = create_store(*mapping_count, false);
        let snapshot = store.all_mappings();

        // Newest mapping (best case)
        let newest = RequestDescriptor::new(
            "GET",
            format!("/api/v1/endpoint{}", mapping_count - 1),
        );
        // Oldest mapping (scans everything newer first)
        let oldest = RequestDescriptor::new("GET", "/api/v1/endpoint0");
        // No match (full scan)
        let none = RequestDescriptor::new("GET", "/not/found");

        group.throughput(Throughput::Elements(1));
        for (name, request) in [("newest", &newest), ("oldest", &oldest), ("none", &none)] {
            group.bench_with_input(
                BenchmarkId::new(name, mapping_count),
                mapping_count,
                |b, _| {
                    b.iter(|| find_match(black_box(request), black_box(&snapshot)));
                },
            );
        }
    }

    group.finish();
}

fn bench_header_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_matching");

    for mapping_count in [10, 100, 1000].iter() {
        let store = create_store(*mapping_count, true);
        let snapshot = store.all_mappings();
        let request = RequestDescriptor::new("GET", "/api/v1/endpoint0")
            .with_header("Accept", "application/json")
            .with_header("X-Tenant", "tenant-0")
            .with_header("User-Agent", "bench");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("oldest_with_headers", mapping_count),
            mapping_count,
            |b, _| {
                b.iter(|| find_match(black_box(&request), black_box(&snapshot)));
            },
        );
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let store = create_store(1000, false);
    c.bench_function("all_mappings_snapshot", |b| {
        b.iter(|| black_box(store.all_mappings()));
    });
}

criterion_group!(benches, bench_find_match, bench_header_matching, bench_snapshot);
criterion_main!(benches);
