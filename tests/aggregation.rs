// Offline aggregation over a results directory

use claimguard_bench::analysis::aggregate::{
    analyze, latency_summary, policy_cost_summary, throughput_summary, AnalysisPaths,
};
use std::fs;
use std::path::Path;

const ACCESS_HEADER: &str = "worker,start_time_iso,latency_ms,status,allowed,subject_address,subject_role,resource_id,resource_type,resource_sensitivity,action,error";

fn access_row(latency_ms: f64, status: &str, allowed: &str, error: &str) -> String {
    format!(
        "w0,2026-01-01T00:00:00.000000Z,{:.3},{},{},0x01,1,0x0a,2,3,READ,{}",
        latency_ms, status, allowed, error
    )
}

fn write_access_file(dir: &Path, name: &str, rows: &[String]) {
    let mut content = String::from(ACCESS_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(dir.join(name), content).unwrap();
}

fn populate(dir: &Path) {
    write_access_file(
        dir,
        "latency_read_n4_c10.csv",
        &[
            access_row(10.0, "200", "True", ""),
            access_row(20.0, "200", "True", ""),
            access_row(30.0, "403", "False", ""),
            access_row(40.0, "", "", "\"Connection failed: refused, retry\""),
        ],
    );
    write_access_file(
        dir,
        "throughput_read_n1000_c50.csv",
        &[access_row(100.0, "200", "True", ""), access_row(100.0, "200", "True", "")],
    );
    write_access_file(
        dir,
        "throughput_read_n1000_c10.csv",
        &[access_row(20.0, "200", "True", ""), access_row(30.0, "403", "False", "")],
    );
    fs::write(
        dir.join("policy_updates_10.csv"),
        "worker,index,start_time_iso,latency_ms,status,tx_hash,gas_used,block_number,error\n\
         w0,0,2026-01-01T00:00:00.000000Z,1000.000,200,0xa,50000,10,\n\
         w0,1,2026-01-01T00:00:01.000000Z,3000.000,200,0xb,70000,12,\n\
         w0,2,2026-01-01T00:00:02.000000Z,500.000,500,,,,\"Unexpected status 500, body=x\"\n",
    )
    .unwrap();
}

#[test]
fn test_latency_percentiles_per_file() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let rows = latency_summary(dir.path()).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.test, "latency_read_n4_c10");
    assert_eq!(row.requests, Some(4));
    assert_eq!(row.concurrency, Some(10));
    assert!((row.p50_ms - 25.0).abs() < 1e-9);
    assert!((row.p90_ms - 37.0).abs() < 1e-9);
    assert!(row.p50_ms <= row.p90_ms && row.p90_ms <= row.p99_ms);
}

#[test]
fn test_throughput_sorted_by_concurrency() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let rows = throughput_summary(dir.path()).unwrap();
    let concurrency: Vec<usize> = rows.iter().map(|r| r.concurrency).collect();
    assert_eq!(concurrency, vec![10, 50]);
    // 10 / 0.025 s and 50 / 0.1 s
    assert!((rows[0].throughput_rps - 400.0).abs() < 1e-9);
    assert!((rows[1].throughput_rps - 500.0).abs() < 1e-9);
}

#[test]
fn test_policy_costs_skip_empty_cells() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let costs = policy_cost_summary(&dir.path().join("policy_updates_10.csv")).unwrap();
    assert_eq!(costs.avg_latency_ms, Some(1500.0));
    assert_eq!(costs.avg_gas_used, Some(60000.0));
    assert_eq!(costs.avg_block_number, Some(11.0));
}

#[test]
fn test_analyze_writes_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("experiment_results");
    fs::create_dir_all(&results).unwrap();
    populate(&results);
    let figures = dir.path().join("figures");

    let report = analyze(&AnalysisPaths {
        results_dir: results,
        output_dir: figures.clone(),
        policy_file: "policy_updates_10.csv".to_string(),
    })
    .unwrap();
    assert_eq!(report.written.len(), 4);
    let summary = report.correctness.unwrap();
    assert_eq!(summary.denied, 3);
    assert_eq!(summary.unknown, 1);
    assert_eq!(summary.allow_ratio() + summary.deny_ratio(), 1.0);

    let correctness = fs::read_to_string(figures.join("correctness_summary.csv")).unwrap();
    assert_eq!(
        correctness,
        "total_decisions,allowed,denied,allow_ratio,deny_ratio\n8,5,3,0.625,0.375\n"
    );
    let throughput = fs::read_to_string(figures.join("throughput_summary.csv")).unwrap();
    assert_eq!(throughput, "concurrency,throughput_rps\n10,400.0\n50,500.0\n");
    let policy = fs::read_to_string(figures.join("policy_update_summary.csv")).unwrap();
    assert_eq!(
        policy,
        "avg_latency_ms,avg_gas_used,avg_block_number\n1500.0,60000.0,11.0\n"
    );
}

#[test]
fn test_analyze_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    fs::create_dir_all(&results).unwrap();
    populate(&results);
    let paths = AnalysisPaths {
        results_dir: results,
        output_dir: dir.path().join("out"),
        policy_file: "policy_updates_10.csv".to_string(),
    };

    let first = analyze(&paths).unwrap();
    let snapshot: Vec<Vec<u8>> = first.written.iter().map(|p| fs::read(p).unwrap()).collect();
    let second = analyze(&paths).unwrap();
    let again: Vec<Vec<u8>> = second.written.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(first.written, second.written);
    assert_eq!(snapshot, again);
}

#[test]
fn test_missing_inputs_skip_steps() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join("results");
    fs::create_dir_all(&results).unwrap();
    write_access_file(
        &results,
        "latency_read_n1_c10.csv",
        &[access_row(5.0, "200", "True", "")],
    );

    let report = analyze(&AnalysisPaths {
        results_dir: results,
        output_dir: dir.path().join("out"),
        policy_file: "policy_updates_10.csv".to_string(),
    })
    .unwrap();

    assert!(report.latency.is_some());
    assert!(report.throughput.is_none());
    assert!(report.policy.is_none());
    assert_eq!(report.correctness.map(|c| c.total_decisions), Some(1));
    assert!(!dir.path().join("out").join("policy_update_summary.csv").exists());
}

#[test]
fn test_missing_results_dir_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let report = analyze(&AnalysisPaths {
        results_dir: dir.path().join("does-not-exist"),
        output_dir: dir.path().join("out"),
        policy_file: "policy_updates_10.csv".to_string(),
    })
    .unwrap();
    assert!(report.written.is_empty());
}
