//! Elemental grid battle runner.
//!
//! # Usage
//!
//! ```bash
//! # Run one input file
//! cargo run -p elements_headless -- run --input io/input1.txt --output io/output1.txt
//!
//! # Use a RON config, overriding the process count
//! cargo run -p elements_headless -- --config run.ron run -n 17
//!
//! # Print the board after every wave
//! cargo run -p elements_headless -- run --input io/input1.txt --trace-waves
//!
//! # Verify determinism by running the same input several times
//! cargo run -p elements_headless -- verify --input io/input1.txt --runs 5
//!
//! # Check an input file without running it
//! cargo run -p elements_headless -- validate io/input1.txt
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` for fine-grained filtering.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elements_headless::{
    batch::{run_batch, BatchConfig},
    config::RunConfig,
    input::load_input,
    runner::{run_file, verify_file},
    summary::Census,
    HeadlessError, Result,
};

#[derive(Parser)]
#[command(name = "elements_headless")]
#[command(about = "Distributed elemental grid battle simulation")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// RON run configuration; command-line flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one input file
    Run {
        /// Input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the final board (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Total ranks, coordinator included
        #[arg(short = 'n', long)]
        processes: Option<usize>,

        /// Let wounded units keep attacking instead of healing
        #[arg(long)]
        no_wounded_retreat: bool,

        /// Log the board after every wave
        #[arg(long)]
        trace_waves: bool,

        /// Write a JSON summary here
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Run many input files in parallel
    Batch {
        /// Input files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for boards and batch.json
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Maximum parallel runs (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: usize,

        /// Total ranks per run, coordinator included
        #[arg(short = 'n', long)]
        processes: Option<usize>,
    },

    /// Verify determinism by running the same input several times
    Verify {
        /// Input file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of runs
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Total ranks, coordinator included
        #[arg(short = 'n', long)]
        processes: Option<usize>,
    },

    /// Parse an input file and report problems without running it
    Validate {
        /// Input file
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Run {
            input,
            output,
            processes,
            no_wounded_retreat,
            trace_waves,
            summary,
        } => {
            let mut config = config;
            config.input = input.or(config.input);
            config.output = output.or(config.output);
            config.process_count = processes.unwrap_or(config.process_count);
            if no_wounded_retreat {
                config.rules.heal_when_wounded = false;
            }
            cmd_run(&config, trace_waves, summary.as_deref())
        }
        Commands::Batch {
            inputs,
            output,
            parallel,
            processes,
        } => {
            let mut cluster = config.cluster();
            cluster.process_count = processes.unwrap_or(cluster.process_count);
            cmd_batch(inputs, output, parallel, cluster)
        }
        Commands::Verify {
            input,
            runs,
            processes,
        } => {
            let mut config = config;
            config.input = input.or(config.input);
            config.process_count = processes.unwrap_or(config.process_count);
            cmd_verify(&config, runs)
        }
        Commands::Validate { input } => cmd_validate(&input),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "Run failed");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries boards.
fn init_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(tracing_subscriber::filter::LevelFilter::from_level(
                log_level,
            ))
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => {
            let config = RunConfig::load(path)?;
            tracing::debug!(path = %path.display(), ?config, "Loaded config");
            Ok(config)
        }
        None => Ok(RunConfig::default()),
    }
}

/// Run a single input file
fn cmd_run(config: &RunConfig, trace_waves: bool, summary_path: Option<&Path>) -> Result<()> {
    let input = config.input.as_deref().ok_or(HeadlessError::MissingInput)?;
    let (outcome, summary) = run_file(
        input,
        config.output.as_deref(),
        &config.cluster(),
        trace_waves,
    )?;

    if config.output.is_none() {
        print!("{}", elements_headless::render_board(&outcome.final_board));
    }
    if let Some(path) = summary_path {
        summary.save(path).map_err(|error| HeadlessError::Write {
            path: path.display().to_string(),
            error,
        })?;
    }
    log_census(&summary.census);
    Ok(())
}

/// Run many input files in parallel
fn cmd_batch(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    parallel: usize,
    cluster: elements_cluster::ClusterConfig,
) -> Result<()> {
    let mut config = BatchConfig::new(inputs, output.clone()).with_cluster(cluster);
    config.parallel_runs = parallel;
    let results = run_batch(config);

    let path = output.join("batch.json");
    results.save(&path).map_err(|error| HeadlessError::Write {
        path: path.display().to_string(),
        error,
    })?;
    tracing::info!(
        succeeded = results.runs.len(),
        failed = results.errors.len(),
        summary = %path.display(),
        "Batch written"
    );
    log_census(&results.total_census);
    for error in &results.errors {
        tracing::error!(input = %error.input, message = %error.message, "Batch run failed");
    }
    Ok(())
}

/// Verify determinism
fn cmd_verify(config: &RunConfig, runs: usize) -> Result<()> {
    let input = config.input.as_deref().ok_or(HeadlessError::MissingInput)?;
    let hash = verify_file(input, &config.cluster(), runs)?;
    println!("deterministic over {runs} runs: {hash:016x}");
    Ok(())
}

/// Parse without running
fn cmd_validate(input: &Path) -> Result<()> {
    let scenario = load_input(input)?;
    println!(
        "{}: {}x{} board, {} waves, {} rounds per wave, {} units per wave declared",
        input.display(),
        scenario.board_size,
        scenario.board_size,
        scenario.waves.len(),
        scenario.rounds_per_wave,
        scenario.units_per_wave
    );
    for (index, board) in scenario.waves.iter().enumerate() {
        let census = Census::of(board);
        println!(
            "  wave {}: {} earth, {} fire, {} water, {} air",
            index + 1,
            census.earth,
            census.fire,
            census.water,
            census.air
        );
    }
    Ok(())
}

fn log_census(census: &Census) {
    tracing::info!(
        earth = census.earth,
        fire = census.fire,
        water = census.water,
        air = census.air,
        "Units remaining"
    );
}
