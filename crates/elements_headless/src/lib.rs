//! Command-line runner for the elemental grid battle.
//!
//! Reads an input file, runs it across a coordinator and a square grid of
//! worker ranks, and writes the final board.
//!
//! # Example
//!
//! ```bash
//! # Run one input on 1 coordinator + 9 workers
//! cargo run -p elements_headless -- run --input io/input1.txt --output io/output1.txt -n 10
//!
//! # Check repeated runs agree
//! cargo run -p elements_headless -- verify --input io/input1.txt --runs 5
//!
//! # Many inputs in parallel, with a JSON summary
//! cargo run -p elements_headless -- batch io/*.txt --output results/
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod batch;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod runner;
pub mod summary;

pub use batch::{run_batch, BatchConfig, BatchResults};
pub use config::{ConfigError, RunConfig};
pub use error::{HeadlessError, Result};
pub use input::{load_input, parse_input, InputError};
pub use output::{render_board, write_board};
pub use runner::{run_file, run_scenario, verify_file};
pub use summary::{Census, RunSummary};
