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

//! Experiment plan runner.
//!
//! Each step re-executes this binary with the `access` or `policy`
//! subcommand, so every sweep point gets a fresh process and connection pool.
//! The first failing step stops the plan and its exit code is propagated.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{error, info};

use crate::bench_core::constants::{defaults, plan};
use crate::bench_core::errors::BenchError;

/// One subprocess invocation of the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub stage: &'static str,
    pub args: Vec<String>,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub root_dir: PathBuf,
    pub base_url: String,
    pub seed: Option<u64>,
    pub skip_latency: bool,
    pub skip_throughput: bool,
    pub skip_policy: bool,
}

impl ExperimentPlan {
    pub fn new(root_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            base_url: base_url.into(),
            seed: None,
            skip_latency: false,
            skip_throughput: false,
            skip_policy: false,
        }
    }

    pub fn subjects_path(&self) -> PathBuf {
        self.root_dir.join("outputs").join("subjects.json")
    }

    pub fn resources_path(&self) -> PathBuf {
        self.root_dir.join("outputs").join("resources.json")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root_dir.join("experiment_results")
    }

    /// Fails if reference data is missing; creates the results directory.
    pub fn prepare(&self) -> Result<(), BenchError> {
        for (kind, path) in [
            ("subjects", self.subjects_path()),
            ("resources", self.resources_path()),
        ] {
            if !path.is_file() {
                return Err(BenchError::ConfigurationError(format!(
                    "Cannot find {} file at {}",
                    kind,
                    path.display()
                )));
            }
        }
        std::fs::create_dir_all(self.results_dir())?;
        Ok(())
    }

    pub fn steps(&self) -> Vec<PlannedStep> {
        let mut steps = Vec::new();
        if !self.skip_latency {
            for &n in plan::LATENCY_REQUESTS {
                let file = format!(
                    "{}{}_c{}.csv",
                    plan::LATENCY_FILE_PREFIX,
                    n,
                    plan::LATENCY_CONCURRENCY
                );
                steps.push(self.access_step("latency", n, plan::LATENCY_CONCURRENCY, &file));
            }
        }
        if !self.skip_throughput {
            for &c in plan::THROUGHPUT_CONCURRENCY {
                let file = format!(
                    "{}{}_c{}.csv",
                    plan::THROUGHPUT_FILE_PREFIX,
                    plan::THROUGHPUT_TOTAL_REQUESTS,
                    c
                );
                steps.push(self.access_step(
                    "throughput",
                    plan::THROUGHPUT_TOTAL_REQUESTS,
                    c,
                    &file,
                ));
            }
        }
        if !self.skip_policy {
            let output = self.results_dir().join(defaults::POLICY_RESULTS_FILE);
            let mut args = vec![
                "policy".to_string(),
                "--count".to_string(),
                plan::POLICY_UPDATE_COUNT.to_string(),
                "--base-url".to_string(),
                self.base_url.clone(),
                "--output".to_string(),
                output.display().to_string(),
            ];
            self.push_seed(&mut args);
            steps.push(PlannedStep {
                stage: "policy",
                args,
                output,
            });
        }
        steps
    }

    fn access_step(
        &self,
        stage: &'static str,
        requests: usize,
        concurrency: usize,
        file: &str,
    ) -> PlannedStep {
        let output = self.results_dir().join(file);
        let mut args = vec![
            "access".to_string(),
            "--requests".to_string(),
            requests.to_string(),
            "--concurrency".to_string(),
            concurrency.to_string(),
            "--actions".to_string(),
            defaults::ACTION.to_string(),
            "--subjects".to_string(),
            self.subjects_path().display().to_string(),
            "--resources".to_string(),
            self.resources_path().display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
            "--base-url".to_string(),
            self.base_url.clone(),
        ];
        self.push_seed(&mut args);
        PlannedStep {
            stage,
            args,
            output,
        }
    }

    fn push_seed(&self, args: &mut Vec<String>) {
        if let Some(seed) = self.seed {
            args.push("--seed".to_string());
            args.push(seed.to_string());
        }
    }
}

/// Run every step of `plan` through `exe`, in order.
pub async fn run_plan(plan: &ExperimentPlan, exe: &Path) -> Result<Vec<PathBuf>, BenchError> {
    plan.prepare()?;
    let mut written = Vec::new();
    for step in plan.steps() {
        info!(stage = step.stage, ">>> Running: {} {}", exe.display(), step.args.join(" "));
        let status = Command::new(exe).args(&step.args).status().await?;
        if !status.success() {
            let code = status.code().unwrap_or(1);
            error!(stage = step.stage, code, "Command failed");
            return Err(BenchError::SubprocessFailed {
                command: step.args.join(" "),
                code,
            });
        }
        written.push(step.output);
    }
    info!(steps = written.len(), dir = %plan.results_dir().display(), "All experiments finished");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_plan_layout() {
        let plan = ExperimentPlan::new("root", "http://svc/api");
        let steps = plan.steps();
        assert_eq!(steps.len(), 9);

        let files: Vec<String> = steps
            .iter()
            .map(|s| s.output.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(files[0], "latency_read_n50_c10.csv");
        assert_eq!(files[3], "latency_read_n500_c10.csv");
        assert_eq!(files[4], "throughput_read_n1000_c10.csv");
        assert_eq!(files[7], "throughput_read_n1000_c200.csv");
        assert_eq!(files[8], "policy_updates_10.csv");

        assert_eq!(steps[0].args[0], "access");
        assert!(steps[0].args.windows(2).any(|w| w == ["--base-url", "http://svc/api"]));
        assert_eq!(steps[8].args[..3], ["policy", "--count", "10"]);
    }

    #[test]
    fn test_skips_and_seed() {
        let mut plan = ExperimentPlan::new("root", "http://svc/api");
        plan.skip_latency = true;
        plan.skip_policy = true;
        plan.seed = Some(7);
        let steps = plan.steps();
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| s.stage == "throughput"));
        assert!(steps
            .iter()
            .all(|s| s.args.ends_with(&["--seed".to_string(), "7".to_string()])));
    }

    #[test]
    fn test_prepare_requires_reference_data() {
        let dir = tempfile::tempdir().unwrap();
        let plan = ExperimentPlan::new(dir.path(), "http://svc/api");
        assert!(matches!(
            plan.prepare(),
            Err(BenchError::ConfigurationError(_))
        ));

        std::fs::create_dir_all(dir.path().join("outputs")).unwrap();
        std::fs::write(plan.subjects_path(), "[]").unwrap();
        std::fs::write(plan.resources_path(), "[]").unwrap();
        plan.prepare().unwrap();
        assert!(plan.results_dir().is_dir());
    }
}
