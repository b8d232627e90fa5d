//! Guard worker runtime.
//!
//! Hosts the guard processing engine as a persistent service over a pair of
//! byte streams. Messages are UTF-8 JSON objects separated by `\n\n`; see
//! `guard-worker-protocol` for the envelope shapes. The worker is
//! single-threaded and cooperative: exactly one request is in flight at a
//! time and responses are written in request order.
//!
//! # Modules
//!
//! - [`transport`] - frame reading and writing
//! - [`worker`] - worker state, serve loop, and command handlers
//! - [`version`] - semantic version comparison for compatibility checks

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod transport;
pub mod version;
pub mod worker;

pub use worker::{GuardWorker, WorkerOptions};

use std::io::{BufReader, stdin, stdout};

/// Run the worker over stdio until EOF or a `shutdown` command.
pub fn run_stdio(options: WorkerOptions) -> std::io::Result<()> {
    let mut worker = GuardWorker::new(options);
    let mut reader = BufReader::new(stdin());
    let mut writer = stdout();
    worker.serve(&mut reader, &mut writer)
}
