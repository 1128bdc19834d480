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

// Main entry point for the ClaimGuard benchmarking harness
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use claimguard_bench::analysis::aggregate::{analyze, render_table, AnalysisPaths};
use claimguard_bench::bench_core::constants::defaults;
use claimguard_bench::bench_core::errors::BenchError;
use claimguard_bench::bench_core::reference::ReferenceData;
use claimguard_bench::config::Config;
use claimguard_bench::driver::access::AccessWorkload;
use claimguard_bench::driver::builder::RequestBuilder;
use claimguard_bench::driver::client::GatewayClient;
use claimguard_bench::driver::policy::PolicyWorkload;
use claimguard_bench::driver::runner::{run_workload, RunPlan};
use claimguard_bench::orchestrator::{run_plan, ExperimentPlan};
use claimguard_bench::report::csv_out::{write_access_csv, write_policy_csv};
use claimguard_bench::report::summary::{AccessSummary, PolicySummary};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load-test POST /access with randomized subject/resource/action triples
    Access(AccessArgs),
    /// Submit randomized policy updates to POST /policy
    Policy(PolicyArgs),
    /// Run the full latency, throughput and policy-update experiment plan
    Run(RunArgs),
    /// Aggregate result CSVs into summary tables
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AccessArgs {
    /// Total number of requests
    #[arg(long, default_value_t = defaults::ACCESS_REQUESTS)]
    requests: usize,

    /// Number of concurrent workers
    #[arg(long, default_value_t = defaults::ACCESS_CONCURRENCY)]
    concurrency: usize,

    /// Gateway base URL, e.g. http://localhost:4000/api
    #[arg(long, default_value = defaults::BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = defaults::ACCESS_TIMEOUT_SECS)]
    timeout: u64,

    /// Output CSV file
    #[arg(long, default_value = defaults::ACCESS_OUTPUT)]
    output: PathBuf,

    /// Path to subjects.json
    #[arg(long, default_value = defaults::SUBJECTS_PATH)]
    subjects: PathBuf,

    /// Path to resources.json
    #[arg(long, default_value = defaults::RESOURCES_PATH)]
    resources: PathBuf,

    /// Actions to sample from
    #[arg(long, num_args = 1.., default_value = defaults::ACTION)]
    actions: Vec<String>,

    /// Seed for the request generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct PolicyArgs {
    /// Number of policy updates to send
    #[arg(long, default_value_t = defaults::POLICY_COUNT)]
    count: usize,

    /// Number of concurrent workers
    #[arg(long, default_value_t = defaults::POLICY_CONCURRENCY)]
    concurrency: usize,

    /// Gateway base URL, e.g. http://localhost:4000/api
    #[arg(long, default_value = defaults::BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds (includes chain confirmation)
    #[arg(long, default_value_t = defaults::POLICY_TIMEOUT_SECS)]
    timeout: u64,

    /// Output CSV file
    #[arg(long, default_value = defaults::POLICY_OUTPUT)]
    output: PathBuf,

    /// Seed for the policy generator (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Experiment root holding outputs/ and experiment_results/
    #[arg(long)]
    root: Option<PathBuf>,

    /// Gateway base URL (defaults to CLAIMGUARD_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Seed forwarded to every step
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the latency sweep
    #[arg(long)]
    skip_latency: bool,

    /// Skip the throughput sweep
    #[arg(long)]
    skip_throughput: bool,

    /// Skip the policy-update run
    #[arg(long)]
    skip_policy: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Directory holding the raw result CSVs
    #[arg(long, default_value = defaults::RESULTS_DIR)]
    results_dir: PathBuf,

    /// Directory the summary tables are written to
    #[arg(long, default_value = defaults::FIGURES_DIR)]
    output_dir: PathBuf,

    /// Policy results file name inside the results directory
    #[arg(long, default_value = defaults::POLICY_RESULTS_FILE)]
    policy_file: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    install_panic_hook();

    let mut config = Config::from_env();
    let rejected = config.repair();

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }
    for e in rejected {
        warn!("{}; using the default for this setting", e);
    }

    let result = match cli.command {
        Commands::Access(args) => run_access(args).await,
        Commands::Policy(args) => run_policy(args).await,
        Commands::Run(args) => run_experiments(args, &config).await,
        Commands::Analyze(args) => run_analyze(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<BenchError>()
                .map(BenchError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run_access(args: AccessArgs) -> anyhow::Result<()> {
    let plan = RunPlan::new(args.requests, args.concurrency)?;
    let reference = ReferenceData::load(&args.subjects, &args.resources)
        .context("Failed to load reference data")?;
    let client = GatewayClient::new(&args.base_url, args.timeout)
        .context("Failed to build HTTP client")?;
    let workload = AccessWorkload::new(
        client,
        reference,
        args.actions,
        RequestBuilder::from_seed_option(args.seed),
    )?;

    println!(
        "Running {} access requests with concurrency {} against {}",
        plan.requests, plan.concurrency, args.base_url
    );
    let outcome = run_workload(Arc::new(workload), plan).await;

    ensure_parent_dir(&args.output)?;
    write_access_csv(&args.output, &outcome.records)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("{}", AccessSummary::from_records(&outcome.records, outcome.duration));
    println!("Results written to {}", args.output.display());
    Ok(())
}

async fn run_policy(args: PolicyArgs) -> anyhow::Result<()> {
    let plan = RunPlan::new(args.count, args.concurrency)?;
    let client = GatewayClient::new(&args.base_url, args.timeout)
        .context("Failed to build HTTP client")?;
    let workload = PolicyWorkload::new(client, RequestBuilder::from_seed_option(args.seed));

    println!(
        "Sending {} policy updates with concurrency {} to {}",
        plan.requests, plan.concurrency, args.base_url
    );
    let outcome = run_workload(Arc::new(workload), plan).await;

    ensure_parent_dir(&args.output)?;
    write_policy_csv(&args.output, &outcome.records)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("{}", PolicySummary::from_records(&outcome.records, outcome.duration));
    println!("Results written to {}", args.output.display());
    Ok(())
}

async fn run_experiments(args: RunArgs, config: &Config) -> anyhow::Result<()> {
    let mut plan = ExperimentPlan::new(
        args.root.unwrap_or_else(|| config.root_dir.clone()),
        args.base_url.unwrap_or_else(|| config.base_url.clone()),
    );
    plan.seed = args.seed;
    plan.skip_latency = args.skip_latency;
    plan.skip_throughput = args.skip_throughput;
    plan.skip_policy = args.skip_policy;

    let exe = std::env::current_exe().context("Failed to get current executable path")?;
    info!(root = %plan.root_dir.display(), base_url = %plan.base_url, "Starting experiment plan");

    let written = run_plan(&plan, &exe).await?;
    println!("All experiments finished. Raw CSVs are in {}", plan.results_dir().display());
    for path in written {
        println!("  - {}", path.display());
    }
    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let paths = AnalysisPaths {
        results_dir: args.results_dir,
        output_dir: args.output_dir,
        policy_file: args.policy_file,
    };
    let report = analyze(&paths).context("Analysis failed")?;

    if let Some(latency) = &report.latency {
        println!("=== Latency summary ===\n{}\n", render_table(latency));
    }
    if let Some(throughput) = &report.throughput {
        println!("=== Throughput summary ===\n{}\n", render_table(throughput));
    }
    if let Some(policy) = &report.policy {
        println!("=== Policy update summary ===\n{}\n", render_table(policy));
    }
    if let Some(correctness) = &report.correctness {
        println!(
            "=== Correctness summary ===\n{}\n({} of the denied rows carry no decision)\n",
            render_table(correctness),
            correctness.unknown
        );
    }
    println!(
        "Wrote {} summary file(s) to {}",
        report.written.len(),
        paths.output_dir.display()
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display())),
        _ => Ok(()),
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("PANIC: {} at {}", message, location);
    }));
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("claimguard_bench=info,warn"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}
