//! wispc - command-line entry point.
//!
//! `clap` derive shape (`Cli`) plus logging setup via `tracing_subscriber`;
//! the driver itself only has a library API, so all argument parsing and
//! exit-code handling live here.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wispc_drv::{Config, EmitKind, Session};

/// wisp - an interpreter and LLVM-IR compiler for a small expression
/// language.
#[derive(Parser, Debug)]
#[command(name = "wispc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile and run wisp programs", long_about = None)]
struct Cli {
    /// Source file to compile.
    input: PathBuf,

    /// Print an intermediate representation and stop.
    #[arg(long, value_enum)]
    emit: Option<EmitKind>,

    /// Run the program with the tree-walking evaluator.
    #[arg(long)]
    run: bool,

    /// Emit LLVM IR to a file (default: output.ir).
    #[arg(long)]
    emit_ir: bool,

    /// Output path for --emit-ir.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug-level logging of pipeline spans.
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        // Neither action requested: default to running the program, the
        // most useful behavior for an otherwise bare `wispc file.wisp`.
        let run = cli.run || (!cli.emit_ir && cli.emit.is_none());
        Config { input: cli.input, emit: cli.emit, run, emit_ir: cli.emit_ir, output: cli.output, verbose: cli.verbose }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(false)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from(cli);
    let mut session = Session::new(config);

    match session.compile() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
