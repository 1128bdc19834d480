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

//! Run coordinator.
//!
//! Fills the work queue, fans out `C` workers as tokio tasks, waits for all
//! of them, and hands back every collected record together with the run
//! duration. The coordinator knows nothing about HTTP: each benchmark plugs
//! in through the [`Workload`] trait.

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::bench_core::errors::BenchError;
use crate::bench_core::models::WorkToken;
use crate::driver::collector::ResultCollector;
use crate::driver::queue::WorkQueue;

/// One request/response cycle of a benchmark.
///
/// `execute` must always produce a record: failures are part of the record,
/// never a reason to skip it.
#[async_trait]
pub trait Workload: Send + Sync + 'static {
    type Record: Send + 'static;

    /// Short name used in logs ("access", "policy").
    fn name(&self) -> &'static str;

    async fn execute(&self, worker: &str, token: WorkToken) -> Self::Record;
}

/// Size of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub requests: usize,
    pub concurrency: usize,
}

impl RunPlan {
    pub fn new(requests: usize, concurrency: usize) -> Result<Self, BenchError> {
        if concurrency == 0 {
            return Err(BenchError::ConfigurationError(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            requests,
            concurrency,
        })
    }
}

#[derive(Debug)]
pub struct RunOutcome<R> {
    pub records: Vec<R>,
    /// From the last worker launch until every worker terminated.
    pub duration: Duration,
}

pub fn worker_name(id: usize) -> String {
    format!("w{}", id)
}

/// Execute `plan` against `workload` and gather every record.
pub async fn run_workload<W: Workload>(workload: Arc<W>, plan: RunPlan) -> RunOutcome<W::Record> {
    let queue = Arc::new(WorkQueue::new(plan.requests));
    let collector = Arc::new(ResultCollector::with_capacity(plan.requests));

    info!(
        workload = workload.name(),
        requests = plan.requests,
        concurrency = plan.concurrency,
        "Starting run"
    );

    let mut handles = Vec::with_capacity(plan.concurrency);
    for id in 0..plan.concurrency {
        let workload = Arc::clone(&workload);
        let queue = Arc::clone(&queue);
        let collector = Arc::clone(&collector);
        handles.push(tokio::spawn(async move {
            let name = worker_name(id);
            let mut completed = 0usize;
            while let Some(token) = queue.try_take() {
                let record = workload.execute(&name, token).await;
                collector.append(record);
                completed += 1;
            }
            debug!(worker = %name, completed, "Worker finished");
        }));
    }

    let started = Instant::now();
    for result in join_all(handles).await {
        if let Err(e) = result {
            error!("Worker task failed: {}", e);
        }
    }
    let duration = started.elapsed();

    let records = collector.take_records();
    info!(
        workload = workload.name(),
        completed = records.len(),
        duration_s = duration.as_secs_f64(),
        "Run finished"
    );

    RunOutcome { records, duration }
}
