//! In-process worker harness for protocol tests.
//!
//! Drives the worker either request-by-request through `handle_request` or
//! as a full framed session through `serve`, with the theme store pointed at
//! a temp directory so tests never touch the real user configuration.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use guard_theme::ThemeStore;
use guard_worker::{GuardWorker, WorkerOptions};
use guard_worker_protocol::WorkerRequest;
use serde_json::{Value, json};
use std::io::{BufReader, Cursor};
use tempfile::TempDir;

pub struct WorkerHarness {
    worker: GuardWorker,
    next_id: u64,
    _themes_dir: TempDir,
}

impl WorkerHarness {
    pub fn new() -> Self {
        Self::with_options(WorkerOptions::default())
    }

    pub fn with_options(options: WorkerOptions) -> Self {
        let dir = tempfile::tempdir().expect("temp dir for theme store");
        let themes = ThemeStore::with_paths(
            Some(dir.path().join("custom-themes.json")),
            Some(dir.path().join("current-theme.json")),
        );
        WorkerHarness {
            worker: GuardWorker::with_theme_store(options, themes),
            next_id: 0,
            _themes_dir: dir,
        }
    }

    /// Send one request and return the response as JSON.
    pub fn request(&mut self, command: &str, payload: Option<Value>) -> Value {
        self.next_id += 1;
        let request = WorkerRequest {
            id: self.next_id.to_string(),
            command: command.to_string(),
            payload,
        };
        let response = self.worker.handle_request(request);
        serde_json::to_value(&response).expect("response serializes")
    }

    /// Send a request and unwrap its success result.
    pub fn expect_success(&mut self, command: &str, payload: Option<Value>) -> Value {
        let response = self.request(command, payload);
        assert_eq!(response["status"], "success", "unexpected failure: {response}");
        response["result"].clone()
    }

    /// Send a request and unwrap its error code.
    pub fn expect_error(&mut self, command: &str, payload: Option<Value>) -> String {
        let response = self.request(command, payload);
        assert_eq!(response["status"], "error", "unexpected success: {response}");
        response["code"].as_str().expect("error carries a code").to_string()
    }

    /// Shorthand for a full `setDocument` round.
    pub fn set_document(&mut self, language_id: &str, content: &str, version: i64) -> Value {
        self.expect_success(
            "setDocument",
            Some(json!({
                "fileName": format!("test.{}", language_id),
                "languageId": language_id,
                "content": content,
                "version": version,
            })),
        )
    }
}

/// Run a full framed session over in-memory streams.
///
/// Returns every emitted frame (banner included) as parsed JSON.
pub fn run_session(options: WorkerOptions, raw_input: &str) -> Vec<Value> {
    let dir = tempfile::tempdir().expect("temp dir for theme store");
    let themes = ThemeStore::with_paths(
        Some(dir.path().join("custom-themes.json")),
        Some(dir.path().join("current-theme.json")),
    );
    let mut worker = GuardWorker::with_theme_store(options, themes);
    let mut reader = BufReader::new(Cursor::new(raw_input.as_bytes().to_vec()));
    let mut output = Vec::new();
    worker.serve(&mut reader, &mut output).expect("serve completes");

    String::from_utf8(output)
        .expect("output is UTF-8")
        .split("\n\n")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| serde_json::from_str(chunk.trim()).expect("output frame is JSON"))
        .collect()
}

/// Build one framed request.
pub fn frame(id: &str, command: &str, payload: Option<Value>) -> String {
    let mut obj = json!({ "id": id, "command": command });
    if let Some(payload) = payload {
        obj["payload"] = payload;
    }
    format!("{}\n\n", obj)
}

/// The `(ai, human)` permission pair of a 1-based line.
pub fn perm_at(result: &Value, line: usize) -> (String, String) {
    let entry = &result["linePermissions"][line - 1];
    assert_eq!(entry["line"], line);
    (
        entry["permissions"]["ai"].as_str().unwrap_or_default().to_string(),
        entry["permissions"]["human"].as_str().unwrap_or_default().to_string(),
    )
}

/// The `(ai, human)` context flags of a 1-based line.
pub fn context_at(result: &Value, line: usize) -> (bool, bool) {
    let entry = &result["linePermissions"][line - 1];
    (
        entry["isContext"]["ai"].as_bool().unwrap_or_default(),
        entry["isContext"]["human"].as_bool().unwrap_or_default(),
    )
}
