//! Guard worker binary.
//!
//! Hosts the guard-tag permission engine as a persistent worker speaking
//! `\n\n`-framed JSON over stdio.
//!
//! Usage:
//!   guard-worker \[options\]
//!
//! Options:
//!   --worker-mode        Run the framed JSON worker on stdio
//!   --min-version=X.Y.Z  Compatibility floor for the version handshake
//!   --log                Enable request logging to stderr
//!   --health             Quick health check
//!   --version            Show version information
//!   --help               Show this help message

use guard_worker::{WorkerOptions, run_stdio, worker};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut worker_mode = false;
    let mut options = WorkerOptions::default();

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--worker-mode" => worker_mode = true,
            "--log" => options.verbose = true,
            "--health" => {
                println!("ok {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--version" => {
                println!("guard-worker {}", env!("CARGO_PKG_VERSION"));
                println!("Minimum compatible client: {}", worker::MIN_COMPATIBLE);
                process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            _ if arg.starts_with("--min-version=") => {
                let floor = arg.trim_start_matches("--min-version=");
                options.min_version = Some(floor.to_string());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if !worker_mode {
        eprintln!("guard-worker does nothing without --worker-mode");
        print_help();
        process::exit(1);
    }

    if options.verbose {
        eprintln!("guard-worker starting (stdio, version {})", env!("CARGO_PKG_VERSION"));
    }

    if let Err(e) = run_stdio(options) {
        eprintln!("guard-worker transport error: {}", e);
        process::exit(1);
    }
}

fn print_help() {
    eprintln!("Guard worker");
    eprintln!();
    eprintln!("Usage: guard-worker [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --worker-mode        Run the framed JSON worker on stdio");
    eprintln!("  --min-version=X.Y.Z  Compatibility floor for the version handshake");
    eprintln!("  --log                Enable request logging to stderr");
    eprintln!("  --health             Quick health check (prints 'ok <version>')");
    eprintln!("  --version            Show version information");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  # Run as the editor's analysis worker");
    eprintln!("  guard-worker --worker-mode");
    eprintln!();
    eprintln!("  # Run with a compatibility floor and logging");
    eprintln!("  guard-worker --worker-mode --min-version=0.2.0 --log");
}
