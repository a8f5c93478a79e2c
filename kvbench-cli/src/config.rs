//! Configuration loading from kvbench.toml
//!
//! kvbench configuration can be specified in a `kvbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use kvbench_core::{RunOptions, WorkloadConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name looked up by [`KvbenchConfig::discover`]
pub const CONFIG_FILE: &str = "kvbench.toml";

/// kvbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KvbenchConfig {
    /// Scheduler configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Standard workload parameters
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Backend to benchmark
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Measured iterations per case
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Pause after pre-measure and after each case (e.g., "100ms")
    #[serde(default = "default_settle_delay")]
    pub settle_delay: String,
    /// Minimum spacing between progress updates (e.g., "50ms")
    #[serde(default = "default_progress_interval")]
    pub progress_interval: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            iterations: default_iterations(),
            settle_delay: default_settle_delay(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}
fn default_iterations() -> u64 {
    kvbench_core::DEFAULT_ITERATIONS
}
fn default_settle_delay() -> String {
    "100ms".to_string()
}
fn default_progress_interval() -> String {
    "50ms".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Directory that additionally receives a timestamped copy of every report
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            directory: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl KvbenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Scheduler options from the `[runner]` section
    pub fn run_options(&self) -> anyhow::Result<RunOptions> {
        Ok(RunOptions {
            iterations: self.runner.iterations,
            settle_delay: Self::parse_duration(&self.runner.settle_delay)?,
            progress_interval: Self::parse_duration(&self.runner.progress_interval)?,
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# kvbench Configuration

[runner]
# Backend to benchmark
backend = "memory"
# Measured iterations per case
iterations = 100
# Pause after the pre-measure phase and after each case
settle_delay = "100ms"
# Minimum spacing between progress updates
progress_interval = "50ms"

[workload]
# Size of the key space the cases cycle over
records = 1000
# Records written before the read cases are measured
prefill = 1000
# Number of stores each write fans out to
stores = 1
# Value shape: flat, nested, or blob
payload = "flat"
# Approximate payload size in bytes
payload_size = 128
# Records per bulk call
batch_size = 100
# Seed for payload generation
seed = 42

[output]
# Default output format: human, json, csv
format = "human"
# Also write a timestamped report here (uncomment to enable)
# directory = "target/kvbench"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}
