//! Batch runner.
//!
//! Runs many input files in parallel using rayon, writing one output board
//! per input and a JSON summary of the whole batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use elements_cluster::ClusterConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::runner::run_file;
use crate::summary::{save_json, Census, RunSummary};

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Input files.
    pub inputs: Vec<PathBuf>,
    /// Directory for output boards and `batch.json`.
    pub output_dir: PathBuf,
    /// Maximum parallel runs (0 = use rayon default).
    pub parallel_runs: usize,
    /// Cluster settings applied to every run.
    pub cluster: ClusterConfig,
}

impl BatchConfig {
    /// Batch over `inputs`, writing into `output_dir`.
    pub fn new(inputs: Vec<PathBuf>, output_dir: PathBuf) -> Self {
        Self {
            inputs,
            output_dir,
            parallel_runs: 0,
            cluster: ClusterConfig::default(),
        }
    }

    /// Set the cluster settings.
    pub fn with_cluster(mut self, cluster: ClusterConfig) -> Self {
        self.cluster = cluster;
        self
    }

    /// Output board path for `input`.
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map_or_else(|| "run".to_string(), |stem| stem.to_string_lossy().into_owned());
        self.output_dir.join(format!("{stem}.out.txt"))
    }
}

/// A run that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// Input file.
    pub input: String,
    /// Error message.
    pub message: String,
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// One summary per successful run, in input order.
    pub runs: Vec<RunSummary>,
    /// Units left across every successful run.
    pub total_census: Census,
    /// Failed runs, in input order.
    pub errors: Vec<BatchError>,
    /// Wall-clock time.
    pub duration_seconds: f64,
}

impl BatchResults {
    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        save_json(path, self)
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Run every input in the batch.
pub fn run_batch(config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(
        inputs = config.inputs.len(),
        output = %config.output_dir.display(),
        processes = config.cluster.process_count,
        "Starting batch"
    );

    if config.parallel_runs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_runs)
            .build_global()
            .ok(); // Ignore if already set
    }

    let results: Vec<Result<RunSummary, BatchError>> = config
        .inputs
        .par_iter()
        .map(|input| {
            let output = config.output_path(input);
            run_file(input, Some(&output), &config.cluster, false)
                .map(|(_, summary)| summary)
                .map_err(|error| {
                    warn!(input = %input.display(), %error, "Run failed");
                    BatchError {
                        input: input.display().to_string(),
                        message: error.to_string(),
                    }
                })
        })
        .collect();

    let mut runs = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(summary) => runs.push(summary),
            Err(error) => errors.push(error),
        }
    }

    let total_census = runs.iter().fold(Census::default(), |acc, run| Census {
        earth: acc.earth + run.census.earth,
        fire: acc.fire + run.census.fire,
        water: acc.water + run.census.water,
        air: acc.air + run.census.air,
    });
    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        succeeded = runs.len(),
        failed = errors.len(),
        duration_seconds,
        "Batch complete"
    );

    BatchResults {
        config,
        runs,
        total_census,
        errors,
        duration_seconds,
    }
}
