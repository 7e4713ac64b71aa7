//! Program generator CLI.
//!
//! This binary drives one generation run. It performs:
//! 1. **Configuration:** Built-in defaults, an optional JSON file, then command line overrides.
//! 2. **Generation:** Draws a program from the seed and writes C source to a file or stdout.
//! 3. **Reporting:** Optional disassembly listing and instruction-mix statistics on stderr.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rxgen_core::config::{DramMode, StackOverflowPolicy};
use rxgen_core::{GenStats, Generator, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(
    name = "rxgen",
    author,
    version,
    about = "Reference C program generator for the randomized VM",
    long_about = "Draw pseudo-random 128-bit instruction words from a seed and emit a standalone C program that executes them.\n\nThe same seed and configuration always produce the same program.\n\nExamples:\n  rxgen --seed 42 -o prog.c\n  rxgen --config gen.json --stats\n  rxgen --seed 7 --program-size 64 --listing"
)]
struct Cli {
    /// Seed of the instruction and constant generator (random if omitted).
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON configuration file; command line options override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file for the C program (stdout if omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of instruction slots (power of two, at least 4).
    #[arg(long)]
    program_size: Option<usize>,

    /// Instruction budget of the emitted program.
    #[arg(long)]
    instructions: Option<u64>,

    /// Back DRAM reads with a 4 GiB AES-filled buffer instead of the LCG.
    #[arg(long)]
    real_dram: bool,

    /// Emit a call stack bound check that aborts the program on overflow.
    #[arg(long)]
    checked_stack: bool,

    /// Print a disassembly listing of the drawn program to stderr.
    #[arg(long)]
    listing: bool,

    /// Print instruction-mix statistics to stderr.
    #[arg(long)]
    stats: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("rxgen: {e}");
        process::exit(1);
    }
}

/// Builds the configuration: file (or defaults), then command line overrides.
fn load_config(cli: &Cli) -> rxgen_core::Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            GeneratorConfig::from_json(&fs::read_to_string(path)?)?
        }
        None => GeneratorConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(n) = cli.program_size {
        config.program_size = n;
    }
    if let Some(n) = cli.instructions {
        config.instruction_count = n;
    }
    if cli.real_dram {
        config.dram = DramMode::Buffer;
    }
    if cli.checked_stack {
        config.stack_overflow = StackOverflowPolicy::Fault;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> rxgen_core::Result<()> {
    let config = load_config(cli)?;
    let generator = Generator::new(config)?;
    let program = generator.draw_program();

    if cli.listing {
        eprint!("{}", program.listing());
    }

    let stats: GenStats = match &cli.output {
        Some(path) => {
            let stats = generator.emit(&program, BufWriter::new(File::create(path)?))?;
            info!(path = %path.display(), "program written");
            stats
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            let stats = generator.emit(&program, BufWriter::new(&mut lock))?;
            lock.flush()?;
            stats
        }
    };

    if cli.stats {
        eprint!("{stats}");
    }
    Ok(())
}
