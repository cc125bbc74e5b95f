use std::fs;
use std::io::Write;

use anyhow::{bail, Context};
use clap::Parser;
use hamplan_algo::{contiguous_cuts, lpt_assignment};
use hamplan_core::ScheduleEntry;
use tabwriter::TabWriter;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match cli.command {
        Commands::Balance {
            loads,
            threads,
            contiguous,
        } => {
            let text = fs::read_to_string(&loads)
                .with_context(|| format!("reading {}", loads.display()))?;
            let block_loads: Vec<u64> =
                serde_json::from_str(&text).context("loads file must be a JSON array of integers")?;
            info!(
                "balancing {} blocks across {} threads ({})",
                block_loads.len(),
                threads,
                if contiguous { "contiguous" } else { "greedy LPT" }
            );

            let bin_loads = if contiguous {
                let cuts = contiguous_cuts(&block_loads, threads)?;
                let mut loads = vec![0u64; threads];
                for (bin, range) in cuts.iter().enumerate() {
                    loads[bin] = block_loads[range.clone()].iter().sum();
                }
                loads
            } else {
                let assignment = lpt_assignment(&block_loads, threads)?;
                let mut loads = vec![0u64; threads];
                for (i, &bin) in assignment.iter().enumerate() {
                    loads[bin] += block_loads[i];
                }
                loads
            };

            print_bin_loads(&bin_loads)?;
        }
        Commands::Blocks { file } => {
            let text =
                fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let sizes = parse_block_sizes(&text)?;
            let dimension: usize = sizes.iter().sum();
            let group_a = sizes.len().div_ceil(2);
            info!("parsed {} block sizes from {}", sizes.len(), file.display());

            println!("blocks:    {}", sizes.len());
            println!("dimension: {}", dimension);
            println!("group A:   {} blocks", group_a);
            println!("group B:   {} blocks", sizes.len() - group_a);
        }
        Commands::Schedule { threads, groups } => {
            if threads == 0 {
                bail!("--threads must be at least 1");
            }
            let columns = 1 + 2 * groups;
            for column in 1..=columns {
                for row in 1..=threads {
                    let entry = ScheduleEntry::new(row, column, threads, column)?;
                    println!("{entry}");
                }
            }
        }
    }
    Ok(())
}

fn parse_block_sizes(text: &str) -> anyhow::Result<Vec<usize>> {
    let mut sizes = Vec::new();
    for token in text.split_whitespace() {
        let size: usize = token
            .parse()
            .with_context(|| format!("invalid block size '{token}'"))?;
        if size != 0 {
            sizes.push(size);
        }
    }
    if sizes.is_empty() {
        bail!("block-size file holds no nonzero sizes");
    }
    Ok(sizes)
}

fn print_bin_loads(bin_loads: &[u64]) -> anyhow::Result<()> {
    let total: u64 = bin_loads.iter().sum();
    let max = bin_loads.iter().copied().max().unwrap_or(0);
    let mean = total as f64 / bin_loads.len() as f64;

    let mut tw = TabWriter::new(std::io::stdout());
    writeln!(tw, "bin\tload")?;
    for (bin, load) in bin_loads.iter().enumerate() {
        writeln!(tw, "{}\t{}", bin + 1, load)?;
    }
    tw.flush()?;

    println!("total:     {total}");
    println!("max:       {max}");
    if total > 0 {
        println!("imbalance: {:.4}", max as f64 / mean);
    }
    Ok(())
}
