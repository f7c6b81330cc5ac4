//! CLI argument parsing for pairset

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pairset")]
#[command(version)]
#[command(
    about = "Assemble a labeled feature matrix from pairwise interference benchmarks",
    long_about = None
)]
pub struct Cli {
    /// Results root directory produced by the benchmark harness
    #[arg(value_name = "RESULTS_ROOT")]
    pub results_root: PathBuf,

    /// Normalized-runtime threshold above which a pair is labeled contending
    #[arg(long = "cutoff", value_name = "RATIO", default_value = "1.15")]
    pub cutoff: f64,

    /// Configuration to build the matrix for (repeat the flag for several)
    #[arg(long = "config", value_name = "NAME", default_value = "L3-SMT")]
    pub configs: Vec<String>,

    /// Per-pair feature matrix filename looked up in every pair directory
    #[arg(
        long = "matrix-file",
        value_name = "NAME",
        default_value = "matrix_X_uncore_shared.csv"
    )]
    pub matrix_file: String,

    /// Output filename, created under the results root
    #[arg(
        long = "output",
        value_name = "NAME",
        default_value = "wekka_xy_L3-SMT_uncore_shared.csv"
    )]
    pub output: String,

    /// Skip A-vs-A pivot cells instead of classifying them
    #[arg(long = "skip-self-pairs")]
    pub skip_self_pairs: bool,

    /// Enable debug diagnostics on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
