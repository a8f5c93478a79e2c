#![warn(missing_docs)]
//! kvbench CLI Library
//!
//! Command-line front end for the kvbench engine: config discovery, backend selection,
//! case filtering, terminal progress, Ctrl-C cancellation and report output.
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     kvbench_cli::run()
//! }
//! ```

mod config;
mod progress;

pub use config::*;
pub use progress::BarProgress;

use clap::{Parser, Subcommand};
use kvbench_core::{
    Case, Database, MemoryDatabase, PayloadShape, ProgressSink, RunOptions, SampleRecorder,
    Scheduler, WorkloadConfig, standard_cases,
};
use kvbench_report::{OutputFormat, Report, ReportConfig, ReportMeta, build_report};
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// kvbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "kvbench")]
#[command(author, version, about = "kvbench - benchmark runner for keyed-storage backends")]
pub struct Cli {
    /// Optional subcommand (Run, List, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter cases by regex pattern
    #[arg(default_value = ".*")]
    pub filter: String,

    /// Backend to benchmark
    #[arg(long)]
    pub backend: Option<String>,

    /// Measured iterations per case
    #[arg(long, short = 'n')]
    pub iterations: Option<u64>,

    /// Size of the key space
    #[arg(long)]
    pub records: Option<u64>,

    /// Records written before read cases are measured
    #[arg(long)]
    pub prefill: Option<u64>,

    /// Number of stores each write fans out to
    #[arg(long)]
    pub stores: Option<usize>,

    /// Payload shape: flat, nested, blob
    #[arg(long)]
    pub payload: Option<String>,

    /// Approximate payload size in bytes
    #[arg(long)]
    pub payload_size: Option<usize>,

    /// Records per bulk call
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause after pre-measure and after each case (e.g., "100ms")
    #[arg(long)]
    pub settle_delay: Option<String>,

    /// Output format: human, json, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (discovered from the current directory if not specified)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the standard cases (default)
    Run,
    /// List the standard cases and whether the backend can run them
    List,
    /// Write a default kvbench.toml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Backends the CLI can instantiate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// In-process `MemoryDatabase`
    Memory,
}

impl BackendKind {
    /// Instantiate the backend
    pub fn open(self) -> Arc<dyn Database> {
        match self {
            BackendKind::Memory => Arc::new(MemoryDatabase::new()),
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(BackendKind::Memory),
            other => Err(anyhow::anyhow!("Unknown backend: {}", other)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

/// Effective settings after layering kvbench.toml and CLI flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// Backend under test
    pub backend: BackendKind,
    /// Scheduler options
    pub options: RunOptions,
    /// Workload parameters
    pub workload: WorkloadConfig,
    /// Report format
    pub format: OutputFormat,
    /// Directory receiving a timestamped copy of the report
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Layer CLI flags over config file values
    pub fn resolve(cli: &Cli, config: &KvbenchConfig) -> anyhow::Result<Self> {
        let backend: BackendKind = cli
            .backend
            .as_deref()
            .unwrap_or(&config.runner.backend)
            .parse()?;

        let mut options = config.run_options()?;
        if let Some(iterations) = cli.iterations {
            options.iterations = iterations;
        }
        if let Some(delay) = &cli.settle_delay {
            options.settle_delay = KvbenchConfig::parse_duration(delay)?;
        }
        options.validate()?;

        let mut workload = config.workload.clone();
        if let Some(records) = cli.records {
            workload.records = records;
        }
        if let Some(prefill) = cli.prefill {
            workload.prefill = prefill;
        }
        if let Some(stores) = cli.stores {
            workload.stores = stores;
        }
        if let Some(payload) = &cli.payload {
            workload.payload = PayloadShape::from_str(payload).map_err(anyhow::Error::msg)?;
        }
        if let Some(size) = cli.payload_size {
            workload.payload_size = size;
        }
        if let Some(batch) = cli.batch_size {
            workload.batch_size = batch;
        }
        workload.validate()?;

        let format: OutputFormat = cli
            .format
            .as_deref()
            .unwrap_or(&config.output.format)
            .parse()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            backend,
            options,
            workload,
            format,
            directory: config.output.directory.as_ref().map(PathBuf::from),
        })
    }
}

/// Run the kvbench CLI with process arguments
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the kvbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        "kvbench=debug"
    } else {
        "kvbench=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => KvbenchConfig::load(path)?,
        None => KvbenchConfig::discover().unwrap_or_default(),
    };

    match cli.command {
        Some(Commands::Init { force }) => init_config(Path::new(CONFIG_FILE), force),
        Some(Commands::List) => {
            let settings = Settings::resolve(&cli, &config)?;
            print!("{}", list_cases(&settings, &compile_filter(&cli.filter)?)?);
            Ok(())
        }
        Some(Commands::Run) | None => {
            let settings = Settings::resolve(&cli, &config)?;
            let filter = compile_filter(&cli.filter)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_cases(&cli, &settings, &filter))
        }
    }
}

fn compile_filter(pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(pattern).map_err(|e| anyhow::anyhow!("Invalid filter '{}': {}", pattern, e))
}

/// Write the default configuration, refusing to clobber an existing file unless forced
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    std::fs::write(path, KvbenchConfig::default_toml())?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Build a scheduler holding the standard cases whose names match `filter`
pub fn build_scheduler(
    settings: &Settings,
    db: Arc<dyn Database>,
    filter: &Regex,
) -> anyhow::Result<Scheduler> {
    let scheduler =
        Scheduler::new(settings.options.clone())?.with_capabilities(db.capabilities());
    for (name, spec) in standard_cases(db, &settings.workload)? {
        if filter.is_match(&name) {
            scheduler.add(name, spec)?;
        }
    }
    Ok(scheduler)
}

/// Render the case plan for `kvbench list`
pub fn list_cases(settings: &Settings, filter: &Regex) -> anyhow::Result<String> {
    let db = settings.backend.open();
    let available = db.capabilities();
    let mut output = format!("kvbench Plan ({}):\n", db.name());

    let mut total = 0;
    for (name, spec) in standard_cases(db, &settings.workload)? {
        if !filter.is_match(&name) {
            continue;
        }
        let case = Case::new(name, spec)?;
        let missing = case.requires().missing_from(available);
        let note = if missing.is_empty() {
            String::new()
        } else {
            format!(" [skipped: missing {}]", missing)
        };
        output.push_str(&format!(
            "├── {} (bulk factor {}){}\n",
            case.name(),
            case.bulk_factor(),
            note
        ));
        total += 1;
    }
    output.push_str(&format!("{} cases found.\n", total));
    Ok(output)
}

/// Run the matching standard cases and build the report.
///
/// Ctrl-C during the run requests cooperative cancellation; the partial results are
/// still reported.
pub async fn execute(
    settings: &Settings,
    filter: &Regex,
    progress: Arc<dyn ProgressSink>,
) -> anyhow::Result<Report> {
    execute_on(settings.backend.open(), settings, filter, progress).await
}

async fn execute_on(
    db: Arc<dyn Database>,
    settings: &Settings,
    filter: &Regex,
    progress: Arc<dyn ProgressSink>,
) -> anyhow::Result<Report> {
    db.open().await?;

    let recorder = Arc::new(SampleRecorder::new());
    let scheduler = build_scheduler(settings, Arc::clone(&db), filter)?
        .with_hooks(recorder.clone())
        .with_progress(progress);
    if scheduler.is_empty() {
        tracing::warn!(filter = filter.as_str(), "no cases match the filter");
    }

    let handle = scheduler.cancel_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && handle.cancel() {
            eprintln!("\nCancelling; waiting for the current case to clean up...");
        }
    });
    let result = scheduler.run().await;
    watcher.abort();
    if let Err(e) = db.close().await {
        tracing::warn!(backend = db.name(), error = %e, "failed to close backend");
    }
    let summary = result?;

    let meta = ReportMeta::new(
        db.name(),
        ReportConfig::new(scheduler.options(), Some(settings.workload.clone())),
    );
    Ok(build_report(&summary, &recorder.take(), meta))
}

async fn run_cases(cli: &Cli, settings: &Settings, filter: &Regex) -> anyhow::Result<()> {
    println!(
        "Running kvbench against {} ({} iterations per case)...\n",
        settings.backend, settings.options.iterations
    );

    let bar = Arc::new(BarProgress::new());
    let report = execute(settings, filter, bar.clone()).await;
    bar.finish();
    let report = report?;

    let output = settings.format.render(&report)?;
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if let Some(directory) = &settings.directory {
        let path = save_report(directory, &report, settings.format, &output)?;
        println!("Report saved to: {}", path.display());
    }

    if report.summary.run_aborted {
        eprintln!("\nRun cancelled; results are partial");
    }
    if report.summary.failed > 0 {
        return Err(anyhow::anyhow!("{} case(s) failed", report.summary.failed));
    }
    Ok(())
}

fn save_report(
    directory: &Path,
    report: &Report,
    format: OutputFormat,
    output: &str,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(format!(
        "report-{}.{}",
        report.meta.timestamp.format("%Y%m%d-%H%M%S"),
        format.extension()
    ));
    std::fs::write(&path, output)?;
    Ok(path)
}
