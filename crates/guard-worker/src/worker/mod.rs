//! Worker state, serve loop, and request dispatch.
//!
//! The dispatch layer is organized into focused submodules:
//!
//! - **documents**: `setDocument` / `applyDelta` and the shared analysis path
//! - **themes**: the theme CRUD commands
//! - **lifecycle**: `version`, `ping`, `shutdown`
//!
//! Every accepted request produces exactly one response, written before the
//! next request is read. There is no cancellation; a request runs to
//! completion.

mod documents;
mod lifecycle;
mod themes;

use crate::transport::{read_frame, write_frame};
use crate::version::satisfies_min;
use guard_document::DocumentStore;
use guard_theme::ThemeStore;
use guard_worker_protocol::{
    INVALID_JSON, StartupBanner, UNKNOWN_COMMAND, VERSION_MISMATCH, WorkerRequest, WorkerResponse,
};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// Worker version, compiled in from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Oldest client version the worker will talk to.
pub const MIN_COMPATIBLE: &str = "0.1.0";

/// Startup configuration from the command line.
#[derive(Debug, Clone, Default)]
pub struct WorkerOptions {
    /// Compatibility floor requested via `--min-version`.
    pub min_version: Option<String>,
    /// Verbose per-request logging to stderr.
    pub verbose: bool,
}

/// A command handler failure: message plus stable wire code.
pub(crate) struct CommandError {
    pub message: String,
    pub code: &'static str,
}

impl CommandError {
    pub(crate) fn new(message: impl Into<String>, code: &'static str) -> Self {
        CommandError { message: message.into(), code }
    }
}

impl From<guard_document::DocumentError> for CommandError {
    fn from(err: guard_document::DocumentError) -> Self {
        CommandError { message: err.to_string(), code: err.code() }
    }
}

impl From<guard_theme::ThemeError> for CommandError {
    fn from(err: guard_theme::ThemeError) -> Self {
        CommandError { message: err.to_string(), code: err.code() }
    }
}

pub(crate) type CommandResult = Result<Value, CommandError>;

/// The persistent worker: one document, the theme store, and a clock.
pub struct GuardWorker {
    pub(crate) documents: DocumentStore,
    pub(crate) themes: ThemeStore,
    pub(crate) started: Instant,
    pub(crate) min_version: Option<String>,
    verbose: bool,
    shutdown_received: bool,
}

impl GuardWorker {
    /// Worker with the default per-user theme store.
    pub fn new(options: WorkerOptions) -> Self {
        Self::with_theme_store(options, ThemeStore::new())
    }

    /// Worker with an explicit theme store (tests point it at a temp dir).
    pub fn with_theme_store(options: WorkerOptions, themes: ThemeStore) -> Self {
        GuardWorker {
            documents: DocumentStore::new(),
            themes,
            started: Instant::now(),
            min_version: options.min_version,
            verbose: options.verbose,
            shutdown_received: false,
        }
    }

    /// Serve requests until EOF or a flushed `shutdown` response.
    ///
    /// The startup banner is emitted exactly once, before any response.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: &mut R, writer: &mut W) -> io::Result<()> {
        write_frame(writer, &StartupBanner::new(VERSION))?;

        loop {
            match read_frame(reader)? {
                None => {
                    if self.verbose {
                        eprintln!("guard-worker: EOF, shutting down");
                    }
                    break;
                }
                Some(Err(message)) => {
                    write_frame(writer, &WorkerResponse::error("", message, INVALID_JSON))?;
                }
                Some(Ok(request)) => {
                    let response = self.handle_request(request);
                    write_frame(writer, &response)?;
                    if self.shutdown_received {
                        writer.flush()?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Dispatch one request to its handler and shape the response.
    pub fn handle_request(&mut self, request: WorkerRequest) -> WorkerResponse {
        if self.verbose {
            eprintln!("guard-worker: rx id={} command={}", request.id, request.command);
        }
        let started = Instant::now();
        let WorkerRequest { id, command, payload } = request;

        // A failed --min-version handshake still answers the lifecycle
        // commands so the client can negotiate; everything else is refused.
        if !self.floor_satisfied()
            && !matches!(command.as_str(), "version" | "ping" | "shutdown")
        {
            let floor = self.min_version.as_deref().unwrap_or_default();
            return WorkerResponse::error(
                id,
                format!("worker {} does not satisfy --min-version={}", VERSION, floor),
                VERSION_MISMATCH,
            );
        }

        // Commands that answer from in-memory state skip the timing field;
        // everything that touches the document or theme state reports it.
        let (result, timed) = match command.as_str() {
            "version" => (self.handle_version(), false),
            "ping" => (self.handle_ping(), false),
            "shutdown" => (self.handle_shutdown(), false),
            "setDocument" => (self.handle_set_document(payload), true),
            "applyDelta" => (self.handle_apply_delta(payload), true),
            "getThemes" => (self.handle_get_themes(), true),
            "createTheme" => (self.handle_create_theme(payload), true),
            "updateTheme" => (self.handle_update_theme(payload), true),
            "deleteTheme" => (self.handle_delete_theme(payload), true),
            "exportTheme" => (self.handle_export_theme(payload), true),
            "importTheme" => (self.handle_import_theme(payload), true),
            "getCurrentTheme" => (self.handle_get_current_theme(), true),
            "setCurrentTheme" => (self.handle_set_current_theme(payload), true),
            other => (
                Err(CommandError::new(format!("unknown command '{}'", other), UNKNOWN_COMMAND)),
                false,
            ),
        };

        match result {
            Ok(value) if timed => {
                let elapsed = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;
                WorkerResponse::success_timed(id, value, elapsed)
            }
            Ok(value) => WorkerResponse::success(id, value),
            Err(err) => {
                if self.verbose {
                    eprintln!("guard-worker: error code={} {}", err.code, err.message);
                }
                WorkerResponse::error(id, err.message, err.code)
            }
        }
    }

    /// Whether the worker version satisfies the client's requested floor.
    pub(crate) fn floor_satisfied(&self) -> bool {
        match self.min_version.as_deref() {
            Some(floor) => satisfies_min(VERSION, floor),
            None => true,
        }
    }

    pub(crate) fn request_shutdown(&mut self) {
        self.shutdown_received = true;
    }
}

/// Deserialize a command payload, treating absence or shape mismatch as a
/// protocol-level error with the given code.
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    payload: Option<Value>,
    code: &'static str,
) -> Result<T, CommandError> {
    let value = payload.ok_or_else(|| CommandError::new("missing payload", code))?;
    serde_json::from_value(value)
        .map_err(|e| CommandError::new(format!("malformed payload: {}", e), code))
}
