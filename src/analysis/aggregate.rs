// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Offline aggregation of result CSVs.
//!
//! Four independent steps read the files written by the drivers and emit
//! one summary table each. A step whose inputs are missing is skipped with a
//! notice; the remaining steps still run. Output depends only on file
//! contents, so re-running over an unchanged directory is byte-identical.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analysis::percentile::{mean, SortedSample};
use crate::analysis::table::{matching_files, sweep_parameters, test_name, ResultTable};
use crate::bench_core::constants::{columns, plan, summaries};
use crate::bench_core::errors::BenchError;
use crate::bench_core::models::Decision;
use crate::report::csv_out::write_rows;

#[derive(Debug, Clone, PartialEq)]
pub struct LatencyRow {
    pub test: String,
    pub requests: Option<usize>,
    pub concurrency: Option<usize>,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputRow {
    pub concurrency: usize,
    pub throughput_rps: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyCostSummary {
    pub avg_latency_ms: Option<f64>,
    pub avg_gas_used: Option<f64>,
    pub avg_block_number: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrectnessSummary {
    pub total_decisions: usize,
    pub allowed: usize,
    /// Everything that is not an explicit allow, unknown decisions included.
    pub denied: usize,
    /// Part of `denied` with no decision at all. Console only.
    pub unknown: usize,
}

impl CorrectnessSummary {
    pub fn allow_ratio(&self) -> f64 {
        ratio(self.allowed, self.total_decisions)
    }

    pub fn deny_ratio(&self) -> f64 {
        ratio(self.denied, self.total_decisions)
    }
}

/// A summary table ready to be written and printed.
pub trait SummaryTable {
    fn header(&self) -> &'static [&'static str];
    fn rows(&self) -> Vec<Vec<String>>;
}

impl SummaryTable for Vec<LatencyRow> {
    fn header(&self) -> &'static [&'static str] {
        &columns::LATENCY_SUMMARY
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|r| {
                vec![
                    r.test.clone(),
                    optional_count(r.requests),
                    optional_count(r.concurrency),
                    format_float(r.p50_ms),
                    format_float(r.p90_ms),
                    format_float(r.p99_ms),
                ]
            })
            .collect()
    }
}

impl SummaryTable for Vec<ThroughputRow> {
    fn header(&self) -> &'static [&'static str] {
        &columns::THROUGHPUT_SUMMARY
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.iter()
            .map(|r| vec![r.concurrency.to_string(), format_float(r.throughput_rps)])
            .collect()
    }
}

impl SummaryTable for PolicyCostSummary {
    fn header(&self) -> &'static [&'static str] {
        &columns::POLICY_SUMMARY
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            optional_float(self.avg_latency_ms),
            optional_float(self.avg_gas_used),
            optional_float(self.avg_block_number),
        ]]
    }
}

impl SummaryTable for CorrectnessSummary {
    fn header(&self) -> &'static [&'static str] {
        &columns::CORRECTNESS_SUMMARY
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.total_decisions.to_string(),
            self.allowed.to_string(),
            self.denied.to_string(),
            format_float(self.allow_ratio()),
            format_float(self.deny_ratio()),
        ]]
    }
}

/// Everything one `analyze` invocation produced. `None` marks a skipped step.
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub latency: Option<Vec<LatencyRow>>,
    pub throughput: Option<Vec<ThroughputRow>>,
    pub policy: Option<PolicyCostSummary>,
    pub correctness: Option<CorrectnessSummary>,
    pub written: Vec<PathBuf>,
}

/// Input and output locations of an `analyze` invocation.
#[derive(Debug, Clone)]
pub struct AnalysisPaths {
    pub results_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy_file: String,
}

/// P50/P90/P99 per latency sweep file.
pub fn latency_summary(results_dir: &Path) -> Result<Vec<LatencyRow>, BenchError> {
    let mut rows = Vec::new();
    for path in matching_files(results_dir, plan::LATENCY_FILE_PREFIX)? {
        let sample = match ResultTable::read(&path).and_then(|t| t.numeric_column("latency_ms")) {
            Ok(values) => SortedSample::new(values),
            Err(e) => {
                warn!(path = %path.display(), "Skipping latency file: {}", e);
                continue;
            }
        };
        let (Some(p50), Some(p90), Some(p99)) = (
            sample.percentile(50.0),
            sample.percentile(90.0),
            sample.percentile(99.0),
        ) else {
            warn!(path = %path.display(), "Skipping latency file without latency values");
            continue;
        };
        let test = test_name(&path);
        let (requests, concurrency) = sweep_parameters(&test);
        rows.push(LatencyRow {
            test,
            requests,
            concurrency,
            p50_ms: p50,
            p90_ms: p90,
            p99_ms: p99,
        });
    }
    Ok(rows)
}

/// Steady-state throughput estimate per throughput sweep file:
/// `concurrency / mean_latency_seconds`.
///
/// Every row counts, denied and failed included: this is decisions per
/// second, not successful reads per second.
pub fn throughput_summary(results_dir: &Path) -> Result<Vec<ThroughputRow>, BenchError> {
    let mut rows = Vec::new();
    for path in matching_files(results_dir, plan::THROUGHPUT_FILE_PREFIX)? {
        let test = test_name(&path);
        let Some(concurrency) = sweep_parameters(&test).1 else {
            warn!(path = %path.display(), "Skipping throughput file without concurrency in its name");
            continue;
        };
        let latencies = match ResultTable::read(&path).and_then(|t| t.numeric_column("latency_ms")) {
            Ok(values) => values,
            Err(e) => {
                warn!(path = %path.display(), "Skipping throughput file: {}", e);
                continue;
            }
        };
        match mean(&latencies) {
            Some(avg_ms) if avg_ms > 0.0 => rows.push(ThroughputRow {
                concurrency,
                throughput_rps: concurrency as f64 / (avg_ms / 1000.0),
            }),
            _ => warn!(path = %path.display(), "Skipping throughput file without usable latencies"),
        }
    }
    rows.sort_by_key(|r| r.concurrency);
    Ok(rows)
}

/// Mean latency, gas used and block number over one policy results file.
pub fn policy_cost_summary(path: &Path) -> Result<PolicyCostSummary, BenchError> {
    let table = ResultTable::read(path)?;
    Ok(PolicyCostSummary {
        avg_latency_ms: mean(&table.numeric_column("latency_ms")?),
        avg_gas_used: mean(&table.numeric_column("gas_used")?),
        avg_block_number: mean(&table.numeric_column("block_number")?),
    })
}

/// Allow/deny totals over every access results file that has an `allowed`
/// column. Any row without an explicit allow counts as denied, so the two
/// ratios sum to one. There is no ground truth: these are descriptive counts.
pub fn correctness_summary(files: &[PathBuf]) -> Result<CorrectnessSummary, BenchError> {
    let mut summary = CorrectnessSummary::default();
    for path in files {
        let table = match ResultTable::read(path) {
            Ok(table) => table,
            Err(e) => {
                warn!(path = %path.display(), "Skipping access file: {}", e);
                continue;
            }
        };
        if !table.has_column("allowed") {
            continue;
        }
        for cell in table.column("allowed")? {
            summary.total_decisions += 1;
            match Decision::from_cell(cell) {
                Decision::Allowed => summary.allowed += 1,
                Decision::Denied => summary.denied += 1,
                Decision::Unknown => {
                    summary.denied += 1;
                    summary.unknown += 1;
                }
            }
        }
    }
    Ok(summary)
}

/// Run all four steps and write their tables into `paths.output_dir`.
pub fn analyze(paths: &AnalysisPaths) -> Result<AnalysisReport, BenchError> {
    std::fs::create_dir_all(&paths.output_dir)?;
    let mut report = AnalysisReport::default();

    if !paths.results_dir.is_dir() {
        warn!(
            dir = %paths.results_dir.display(),
            "Results directory not found; nothing to analyze"
        );
        return Ok(report);
    }

    let latency = latency_summary(&paths.results_dir)?;
    if latency.is_empty() {
        warn!("No {}*.csv files found", plan::LATENCY_FILE_PREFIX);
    } else {
        report
            .written
            .push(emit(&paths.output_dir, summaries::LATENCY, &latency)?);
        report.latency = Some(latency);
    }

    let throughput = throughput_summary(&paths.results_dir)?;
    if throughput.is_empty() {
        warn!("No {}*.csv files found", plan::THROUGHPUT_FILE_PREFIX);
    } else {
        report
            .written
            .push(emit(&paths.output_dir, summaries::THROUGHPUT, &throughput)?);
        report.throughput = Some(throughput);
    }

    let policy_path = paths.results_dir.join(&paths.policy_file);
    if policy_path.is_file() {
        match policy_cost_summary(&policy_path) {
            Ok(policy) => {
                report
                    .written
                    .push(emit(&paths.output_dir, summaries::POLICY, &policy)?);
                report.policy = Some(policy);
            }
            Err(e) => warn!(path = %policy_path.display(), "Skipping policy costs: {}", e),
        }
    } else {
        warn!("No {} found", paths.policy_file);
    }

    let mut access_files = matching_files(&paths.results_dir, plan::THROUGHPUT_FILE_PREFIX)?;
    access_files.extend(matching_files(&paths.results_dir, plan::LATENCY_FILE_PREFIX)?);
    access_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if access_files.is_empty() {
        warn!("No access result files found for the correctness summary");
    } else {
        let correctness = correctness_summary(&access_files)?;
        report
            .written
            .push(emit(&paths.output_dir, summaries::CORRECTNESS, &correctness)?);
        report.correctness = Some(correctness);
    }

    Ok(report)
}

fn emit<T: SummaryTable>(dir: &Path, file: &str, table: &T) -> Result<PathBuf, BenchError> {
    let path = dir.join(file);
    let out = std::fs::File::create(&path)?;
    write_rows(out, table.header(), &table.rows())?;
    info!(path = %path.display(), rows = table.rows().len(), "Saved summary");
    Ok(path)
}

/// Render a table the way it is written to disk, for console output.
pub fn render_table<T: SummaryTable>(table: &T) -> String {
    let mut out = table.header().join(",");
    for row in table.rows() {
        out.push('\n');
        out.push_str(&row.join(","));
    }
    out
}

/// Whole numbers keep one decimal (`1.0`), everything else uses the
/// shortest round-trip representation.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

fn optional_float(v: Option<f64>) -> String {
    v.map(format_float).unwrap_or_default()
}

fn optional_count(v: Option<usize>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(12.5), "12.5");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_ratios_with_no_decisions() {
        let s = CorrectnessSummary::default();
        assert_eq!(s.allow_ratio(), 0.0);
        assert_eq!(s.deny_ratio(), 0.0);
    }

    #[test]
    fn test_render_table() {
        let s = CorrectnessSummary {
            total_decisions: 4,
            allowed: 3,
            denied: 1,
            unknown: 1,
        };
        assert_eq!(
            render_table(&s),
            "total_decisions,allowed,denied,allow_ratio,deny_ratio\n4,3,1,0.75,0.25"
        );
    }
}
