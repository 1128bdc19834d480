use claimguard_bench::analysis::aggregate::correctness_summary;
use claimguard_bench::analysis::percentile::SortedSample;
use claimguard_bench::bench_core::models::{AccessRecord, Decision};
use claimguard_bench::driver::access::classify_access;
use claimguard_bench::driver::builder::RequestBuilder;
use claimguard_bench::report::csv_out::write_access_csv;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_percentiles(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| ((i * 7919) % 10_000) as f64 / 10.0).collect();

    c.bench_function("percentile_p50_p90_p99_10k", |b| {
        b.iter(|| {
            let sample = SortedSample::new(black_box(values.clone()));
            (
                sample.percentile(50.0),
                sample.percentile(90.0),
                sample.percentile(99.0),
            )
        })
    });
}

fn bench_classify_access(c: &mut Criterion) {
    let body = r#"{"allowed":true,"capability":{"token":"abc","expiresAt":1700000000}}"#;

    c.bench_function("classify_access_200", |b| {
        b.iter(|| classify_access(black_box(200), black_box(body)))
    });
}

fn bench_policy_generation(c: &mut Criterion) {
    let builder = RequestBuilder::seeded(1);

    c.bench_function("policy_update_body", |b| {
        b.iter(|| builder.policy_update(black_box(1_700_000_000)))
    });
}

fn bench_correctness_aggregation(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("throughput_read_n1000_c10.csv");
    let records: Vec<AccessRecord> = (0..1000)
        .map(|i| AccessRecord {
            worker: format!("w{}", i % 10),
            start_time_iso: "2026-01-01T00:00:00.000000Z".to_string(),
            latency_ms: i as f64 / 3.0,
            status: Some(if i % 4 == 0 { 403 } else { 200 }),
            allowed: Decision::from_allowed(i % 4 != 0),
            subject_address: "0x01".to_string(),
            subject_role: Some("2".to_string()),
            resource_id: Some("0xaa".to_string()),
            resource_type: Some("2".to_string()),
            resource_sensitivity: Some("3".to_string()),
            action: "READ".to_string(),
            error: None,
        })
        .collect();
    write_access_csv(&path, &records).unwrap();
    let files = vec![path];

    c.bench_function("correctness_summary_1k_rows", |b| {
        b.iter(|| correctness_summary(black_box(&files)))
    });
}

criterion_group!(
    benches,
    bench_percentiles,
    bench_classify_access,
    bench_policy_generation,
    bench_correctness_aggregation
);
criterion_main!(benches);
