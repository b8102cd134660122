//! IMA cycle-accurate simulator CLI.
//!
//! This binary provides a single entry point for running a program on one
//! simulated core. It performs:
//! 1. **Configuration:** Built-in defaults, optionally overridden by a JSON
//!    config file.
//! 2. **Program load:** Parse a JSON instruction listing into instruction
//!    memory.
//! 3. **Run:** Tick the core until halt or the watchdog cap, then print the
//!    retirement report.

use clap::{Parser, Subcommand};
use std::{fs, process};

use ima_core::config::Config;
use ima_core::sim::loader;
use ima_core::sim::simulator::{Simulator, StopReason};

#[derive(Parser, Debug)]
#[command(
    name = "ima-sim",
    author,
    version,
    about = "IMA cycle-accurate simulator",
    long_about = "Run a JSON instruction listing on a single in-memory-analog core.\n\nExamples:\n  ima-sim run -p programs/mvm.json\n  ima-sim run -p programs/load_store.json --config config.json --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program to completion on one core.
    Run {
        /// Program file (JSON instruction listing).
        #[arg(short, long)]
        program: String,

        /// Configuration file (JSON); defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// External memory preload file (JSON array of words, loaded from
        /// address 0 of the memory interface backing store).
        #[arg(long)]
        ext_mem: Option<String>,

        /// Emit the per-cycle pipeline trace to stderr.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            program,
            config,
            ext_mem,
            trace,
        }) => cmd_run(&program, config.as_deref(), ext_mem.as_deref(), trace),
        None => {
            eprintln!("IMA Simulator — pass a subcommand");
            eprintln!();
            eprintln!("  ima-sim run -p <program.json>             Run with default config");
            eprintln!("  ima-sim run -p <program.json> --trace     Run with pipeline trace");
            eprintln!();
            eprintln!("  ima-sim --help  for full options");
            process::exit(1);
        }
    }
}

/// Runs one program to completion and prints the retirement report.
///
/// Exits with code 1 on load or simulation errors, and with code 2 when the
/// watchdog fires before halt.
fn cmd_run(program_path: &str, config_path: Option<&str>, ext_mem_path: Option<&str>, trace: bool) {
    init_tracing(trace);

    let config = match config_path {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error reading config {path}: {e}");
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    let mut sim = match Simulator::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let program = match loader::load_program_file(program_path.as_ref()) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error loading program {program_path}: {e}");
            process::exit(1);
        }
    };
    let program_len = program.len();

    if let Some(path) = ext_mem_path {
        if let Err(e) = preload_external(&mut sim, path) {
            eprintln!("Error loading external memory {path}: {e}");
            process::exit(1);
        }
    }

    if let Err(e) = sim.load_program(program) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    println!("[*] Core {}: {} instructions loaded", sim.core.config.general.core_id, program_len);

    match sim.run() {
        Ok(StopReason::Halted) => {
            println!("\n[*] Halted after {} cycles", sim.cycle);
            print!("{}", sim.core.stats);
        }
        Ok(StopReason::Watchdog) => {
            eprintln!("\n[!] Watchdog: no halt within {} cycles", sim.cycle);
            print!("{}", sim.core.stats);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("\n[!] Simulation error at cycle {}: {e}", sim.cycle);
            process::exit(1);
        }
    }
}

/// Reads a JSON configuration file.
fn load_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Preloads the memory interface backing store from a JSON array of words.
fn preload_external(sim: &mut Simulator, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let words: Vec<i64> = serde_json::from_str(&text)?;
    for (addr, value) in words.into_iter().enumerate() {
        sim.core.mem_interface.preload(addr, value)?;
    }
    Ok(())
}

/// Installs the trace subscriber.
///
/// With `--trace`, the pipeline snapshot target is enabled at debug level;
/// otherwise `RUST_LOG` controls filtering with a warn-level default.
fn init_tracing(trace: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if trace {
        EnvFilter::new("warn,ima=debug,ima::pipeline=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
