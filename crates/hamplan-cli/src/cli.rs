use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Block balancing and schedule planning for sparse Hamiltonians", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Preview bin loads for a set of per-block nnz counts
    Balance {
        /// JSON file holding the per-block nnz counts as an array
        #[arg(long)]
        loads: PathBuf,
        /// Number of worker threads (bins)
        #[arg(long)]
        threads: usize,
        /// Keep blocks contiguous instead of using greedy LPT
        #[arg(long)]
        contiguous: bool,
    },
    /// Inspect a block-size metadata file
    Blocks {
        /// File of whitespace-separated block row counts (zeros discarded)
        #[arg(long)]
        file: PathBuf,
    },
    /// Emit engine schedule descriptor lines
    Schedule {
        /// Number of worker threads (schedule rows)
        #[arg(long)]
        threads: u32,
        /// Number of coupling groups (each contributes a forward and an
        /// adjoint column after the potential column)
        #[arg(long, default_value_t = 2)]
        groups: u32,
    },
}
