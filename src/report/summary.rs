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

//! End-of-run summaries printed by the drivers.

use std::fmt;
use std::time::Duration;

use crate::analysis::percentile::mean;
use crate::bench_core::models::{AccessRecord, Decision, PolicyRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct AccessSummary {
    pub completed: usize,
    pub duration: Duration,
    pub mean_latency_ms: Option<f64>,
    pub allowed: usize,
    pub denied: usize,
    pub unknown: usize,
    pub errors: usize,
}

impl AccessSummary {
    pub fn from_records(records: &[AccessRecord], duration: Duration) -> Self {
        let count = |d: Decision| records.iter().filter(|r| r.allowed == d).count();
        let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
        Self {
            completed: records.len(),
            duration,
            mean_latency_ms: mean(&latencies),
            allowed: count(Decision::Allowed),
            denied: count(Decision::Denied),
            unknown: count(Decision::Unknown),
            errors: records.iter().filter(|r| r.error.is_some()).count(),
        }
    }

    /// Measured completions per second of wall-clock run time.
    pub fn completions_per_sec(&self) -> f64 {
        per_second(self.completed, self.duration)
    }
}

impl fmt::Display for AccessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Completed {} requests in {:.3} seconds.",
            self.completed,
            self.duration.as_secs_f64()
        )?;
        if let Some(mean) = self.mean_latency_ms {
            writeln!(f, "Average latency: {:.2} ms", mean)?;
            writeln!(
                f,
                "Allowed: {}, Denied: {}, Unknown: {}",
                self.allowed, self.denied, self.unknown
            )?;
            writeln!(f, "Requests with errors: {}", self.errors)?;
            write!(f, "Measured throughput: {:.2} req/s", self.completions_per_sec())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicySummary {
    pub completed: usize,
    pub duration: Duration,
    pub mean_latency_ms: Option<f64>,
    pub min_latency_ms: Option<f64>,
    pub max_latency_ms: Option<f64>,
    pub errors: usize,
}

impl PolicySummary {
    pub fn from_records(records: &[PolicyRecord], duration: Duration) -> Self {
        let latencies: Vec<f64> = records.iter().map(|r| r.latency_ms).collect();
        Self {
            completed: records.len(),
            duration,
            mean_latency_ms: mean(&latencies),
            min_latency_ms: latencies.iter().copied().reduce(f64::min),
            max_latency_ms: latencies.iter().copied().reduce(f64::max),
            errors: records.iter().filter(|r| r.error.is_some()).count(),
        }
    }
}

impl fmt::Display for PolicySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Completed {} policy updates in {:.3} seconds.",
            self.completed,
            self.duration.as_secs_f64()
        )?;
        if let (Some(mean), Some(min), Some(max)) =
            (self.mean_latency_ms, self.min_latency_ms, self.max_latency_ms)
        {
            writeln!(f)?;
            writeln!(f, "Average confirmation latency: {:.2} ms", mean)?;
            writeln!(f, "Min: {:.2} ms, Max: {:.2} ms", min, max)?;
            write!(f, "Updates with errors: {}", self.errors)?;
        }
        Ok(())
    }
}

fn per_second(count: usize, duration: Duration) -> f64 {
    let secs = duration.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}
