//! LU decomposition driver
//!
//! Loads (or generates) a square matrix, factors it serially and/or with a
//! pool of worker threads, prints the factors for small matrices, and reports
//! timings and the parallel speedup.
//!
//! Usage:
//!     cargo run --release --bin lu-decomp -- --input math-lu/data/micro.txt --threads 4
//!     cargo run --release --bin lu-decomp -- --random 1000 --seed 1 --verify

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use math_audio_lu::compare::{ModeRun, compare_modes, run_mode, verify};
use math_audio_lu::{
    EliminationMode, MatrixStore, load_matrix, parallel::is_parallel_available,
    random_diagonally_dominant,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lu-decomp",
    about = "Unpivoted LU decomposition, serial and parallel"
)]
struct Cli {
    /// Text file with one matrix row per line
    #[arg(long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate a random diagonally dominant matrix of this size instead of reading a file
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random (omit for a different matrix each run)
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Number of worker threads for the parallel mode
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Which elimination modes to run
    #[arg(long, value_enum, default_value_t = ModeChoice::Both)]
    mode: ModeChoice,

    /// Check that L * U reproduces the input
    #[arg(long)]
    verify: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeChoice {
    Serial,
    Parallel,
    Both,
}

#[derive(Debug, Clone)]
enum InputSource {
    File(PathBuf),
    Random { n: usize, seed: Option<u64> },
}

#[derive(Debug, Clone, Copy)]
enum Plan {
    Single(EliminationMode),
    Compare { workers: usize },
}

/// Everything the driver needs, resolved from the command line
#[derive(Debug, Clone)]
struct RunConfig {
    source: InputSource,
    plan: Plan,
    verify: bool,
}

impl RunConfig {
    fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let source = match (cli.input, cli.random) {
            (Some(path), None) => InputSource::File(path),
            (None, Some(n)) => InputSource::Random { n, seed: cli.seed },
            (None, None) => bail!("either --input or --random is required"),
            (Some(_), Some(_)) => bail!("--input and --random are mutually exclusive"),
        };

        let parallel = EliminationMode::Parallel {
            workers: cli.threads,
        };
        if cli.mode != ModeChoice::Serial {
            parallel.validate()?;
        }
        let plan = match cli.mode {
            ModeChoice::Serial => Plan::Single(EliminationMode::Serial),
            ModeChoice::Parallel => Plan::Single(parallel),
            ModeChoice::Both => Plan::Compare {
                workers: cli.threads,
            },
        };

        Ok(Self {
            source,
            plan,
            verify: cli.verify,
        })
    }
}

fn load(source: &InputSource) -> anyhow::Result<MatrixStore> {
    match source {
        InputSource::File(path) => {
            println!("Loading from {}", path.display());
            load_matrix(path).with_context(|| format!("failed to load {}", path.display()))
        }
        InputSource::Random { n, seed } => {
            println!("Generating random {n}x{n} matrix");
            Ok(random_diagonally_dominant(*n, *seed)?)
        }
    }
}

fn report(input: &MatrixStore, run: &ModeRun, check: bool) -> anyhow::Result<()> {
    println!("===========");
    println!("Gaussian {}", run.mode);
    print!("{}", run.result.dump());
    println!("Time taken: {:.3}ms", run.elapsed.as_secs_f64() * 1e3);
    if check {
        let err = verify(input, run)?;
        println!("Reconstruction error: {err:.3e}");
    }
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RunConfig::from_cli(Cli::parse())?;
    log::debug!("{config:?}, rayon available: {}", is_parallel_available());

    let input = load(&config.source)?;
    println!("Input mtx size {}", input.size());
    print!("{}", input.dump());

    match config.plan {
        Plan::Single(mode) => {
            let run = run_mode(&input, mode)?;
            report(&input, &run, config.verify)?;
        }
        Plan::Compare { workers } => {
            let cmp = compare_modes(&input, workers)?;
            report(&input, &cmp.serial, config.verify)?;
            report(&input, &cmp.parallel, config.verify)?;
            println!("Speedup: {:.2}x", cmp.speedup());
            if cmp.identical() {
                println!("Serial and parallel results are identical");
            } else {
                let diff = cmp.serial.result.max_abs_diff(&cmp.parallel.result)?;
                eprintln!("Serial and parallel results differ (max |diff| = {diff:e})");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
