//! Command-line runner: load a program image and run it against stdin/stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use synvm_runtime::{RuntimeError, VMConfig, VM};
use synvm_spec::Program;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "synvm", version, about = "Run a SYNVM program image")]
struct Args {
    /// Program image (little-endian 16-bit words)
    #[arg(default_value = "challenge.bin")]
    program: PathBuf,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every executed instruction
    #[arg(long)]
    trace: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> &'static str {
        match (self.trace, self.verbose) {
            (true, _) | (_, 2..) => "trace",
            (_, 1) => "debug",
            _ => "warn",
        }
    }
}

fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Program> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Program::from_bytes(&bytes)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let program = match load(&args.program) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("error: {:#}", err);
            return ExitCode::from(1);
        }
    };

    let config = VMConfig {
        max_cycles: args.max_cycles,
        trace: args.trace,
    };

    let mut vm = VM::new(&program, io::stdin().lock(), io::stdout().lock(), config);

    match vm.run() {
        Ok(result) => {
            tracing::info!(
                cycles = result.cycles,
                chars = result.chars_written,
                reason = ?result.halt_reason,
                "program finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::from(2)
        }
    }
}

fn report(err: &RuntimeError) {
    match err.pc() {
        Some(pc) => eprintln!("\nfault: {} ({} at address {})", err, err.kind(), pc),
        None => eprintln!("\nfault: {} ({})", err, err.kind()),
    }
}
