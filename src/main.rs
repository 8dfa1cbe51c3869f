mod error;
mod generator;
mod operation;
mod reader;
mod workload;
mod writer;

use crate::generator::{KeyDistribution, Sampler};
use crate::operation::OpKind;
use crate::workload::mix::{Mix, MixEntry};
use crate::workload::{Params, Preset, Workload};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use thousands::Separable;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Generate operation workloads for LSM-tree benchmarks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Seed for the random generator, drawn at random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Distribution of keys and range starts
    #[arg(long, global = true, value_enum, default_value_t = KeyDist::Uniform)]
    keys: KeyDist,

    #[arg(long, global = true, default_value_t = 1.0)]
    zipf_exponent: f64,
}

#[derive(Copy, Clone, ValueEnum)]
enum KeyDist {
    Uniform,
    Zipf,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Generate(Generate),
    /// Parse a workload file and print its operation counts
    Check { file: PathBuf },
}

#[derive(Subcommand)]
enum Generate {
    /// Inserts with random keys
    Put {
        num_ops: u64,
        dims: usize,
        key_max: u64,
        folder: PathBuf,
    },
    /// Inserts with consecutive keys starting at key_start
    SeqPut {
        num_ops: u64,
        dims: usize,
        key_start: u64,
        folder: PathBuf,
    },
    /// Point queries
    Get {
        num_ops: u64,
        key_max: u64,
        folder: PathBuf,
    },
    /// Range scans of a fixed width
    Scan {
        num_ops: u64,
        scan_range: u64,
        key_max: u64,
        folder: PathBuf,
    },
    /// Point deletes
    PointDelete {
        num_ops: u64,
        key_max: u64,
        folder: PathBuf,
    },
    /// Range deletes of a fixed width
    RangeDelete {
        num_ops: u64,
        key_max: u64,
        range_size: u64,
        folder: PathBuf,
    },
    /// Shuffled mix of kinds, e.g. --mix put:0.5,get:0.3,scan:0.2
    Mixed {
        total: u64,
        folder: PathBuf,
        #[arg(long, value_delimiter = ',', required = true)]
        mix: Vec<MixEntry>,
        #[arg(long, default_value_t = 2)]
        dims: usize,
        #[arg(long, default_value_t = 100_000)]
        key_max: u64,
        #[arg(long, default_value_t = 10)]
        scan_range: u64,
        #[arg(long, default_value_t = 10)]
        delete_range: u64,
    },
    /// One of the built-in mixes
    Preset {
        #[arg(value_enum)]
        preset: Preset,
        folder: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Check { file } => check(&file),
        Command::Generate(command) => {
            let keys = match cli.keys {
                KeyDist::Uniform => KeyDistribution::Uniform,
                KeyDist::Zipf => KeyDistribution::zipf(cli.zipf_exponent)?,
            };
            run(cli.seed, keys, command)
        }
    }
}

fn run(seed: Option<u64>, keys: KeyDistribution, command: Generate) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, ?keys, "Seeded generator");
    let mut sampler = Sampler::new(seed, keys);

    let (wl, dest) = generate(&mut sampler, command)?;
    if wl.is_empty() {
        warn!("Workload has no operations");
    }
    writer::write(&wl, &dest).with_context(|| format!("writing {}", dest.display()))?;
    info!(
        "Generated {} operations at: {}",
        wl.len().separate_with_underscores(),
        dest.display()
    );
    Ok(())
}

fn generate(s: &mut Sampler, command: Generate) -> Result<(Workload, PathBuf)> {
    let (wl, folder, name) = match command {
        Generate::Put { num_ops, dims, key_max, folder } => {
            let params = Params { key_max, dims, ..Params::default() };
            let wl = workload::homogeneous(s, OpKind::Put, num_ops, &params)?;
            (wl, folder, format!("random_puts_{num_ops}_{key_max}.wl"))
        }
        Generate::SeqPut { num_ops, dims, key_start, folder } => {
            let wl = workload::sequential_inserts(s, num_ops, key_start, dims)?;
            (wl, folder, format!("sequential_puts_{num_ops}_{key_start}.wl"))
        }
        Generate::Get { num_ops, key_max, folder } => {
            let params = Params { key_max, ..Params::default() };
            let wl = workload::homogeneous(s, OpKind::Get, num_ops, &params)?;
            (wl, folder, format!("get_{num_ops}.wl"))
        }
        Generate::Scan { num_ops, scan_range, key_max, folder } => {
            let params = Params { key_max, scan_range, ..Params::default() };
            let wl = workload::homogeneous(s, OpKind::Scan, num_ops, &params)?;
            (wl, folder, format!("scan_{num_ops}_range{scan_range}.wl"))
        }
        Generate::PointDelete { num_ops, key_max, folder } => {
            let params = Params { key_max, ..Params::default() };
            let wl = workload::homogeneous(s, OpKind::Pdel, num_ops, &params)?;
            (wl, folder, format!("point_delete_{num_ops}.wl"))
        }
        Generate::RangeDelete { num_ops, key_max, range_size, folder } => {
            let params = Params { key_max, delete_range: range_size, ..Params::default() };
            let wl = workload::homogeneous(s, OpKind::Rdel, num_ops, &params)?;
            (wl, folder, format!("range_delete_{num_ops}_range{range_size}.wl"))
        }
        Generate::Mixed { total, folder, mix, dims, key_max, scan_range, delete_range } => {
            let counts = Mix::new(mix)?.counts(total)?;
            let params = Params { key_max, dims, scan_range, delete_range };
            let wl = workload::mixed(s, &counts, &params)?;
            (wl, folder, format!("mixed_{total}.wl"))
        }
        Generate::Preset { preset, folder } => {
            let config = workload::get_preset(preset);
            let wl = workload::compose(s, config.as_ref())?;
            (wl, folder, format!("{}.wl", config.get_name()))
        }
    };

    fs::create_dir_all(&folder).with_context(|| format!("creating {}", folder.display()))?;
    Ok((wl, folder.join(name)))
}

fn check(file: &Path) -> Result<()> {
    let wl = reader::read(file)?;
    println!("{}: {} operations", file.display(), wl.len().separate_with_underscores());
    for (kind, n) in wl.counts() {
        println!("{kind}: {}", n.separate_with_underscores());
    }
    Ok(())
}
