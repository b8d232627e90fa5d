//! Wire types for the guard worker's framed JSON protocol.
//!
//! Every message is a UTF-8 JSON object terminated by a blank line
//! (`\n\n`). Requests carry an `id`, a `command`, and an optional `payload`;
//! responses echo the `id` with a `status`, a `result` or an `error` plus
//! stable `code`, and a `timing` in milliseconds when the command did
//! meaningful work. The unsolicited startup banner is emitted exactly once
//! before any response.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codes;
mod commands;

pub use codes::*;
pub use commands::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An incoming request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerRequest {
    /// Correlation id echoed back on the response.
    pub id: String,
    /// Command name, see the command constants.
    pub command: String,
    /// Command-specific payload, absent for nullary commands.
    #[serde(default)]
    pub payload: Option<Value>,
}

/// An outgoing response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerResponse {
    /// Correlation id of the request, empty when the request had none.
    pub id: String,
    /// `"success"` or `"error"`.
    pub status: &'static str,
    /// Command result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Human-readable error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error code on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Wall-clock processing time in milliseconds, for commands that did
    /// meaningful work.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<u64>,
}

impl WorkerResponse {
    /// A success response without timing.
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        WorkerResponse {
            id: id.into(),
            status: "success",
            result: Some(result),
            error: None,
            code: None,
            timing: None,
        }
    }

    /// A success response carrying processing time.
    pub fn success_timed(id: impl Into<String>, result: Value, timing_ms: u64) -> Self {
        WorkerResponse { timing: Some(timing_ms), ..WorkerResponse::success(id, result) }
    }

    /// An error response with a stable code.
    pub fn error(id: impl Into<String>, message: impl Into<String>, code: &'static str) -> Self {
        WorkerResponse {
            id: id.into(),
            status: "error",
            result: None,
            error: Some(message.into()),
            code: Some(code),
            timing: None,
        }
    }
}

/// The unsolicited startup banner, first output of the worker.
#[derive(Debug, Clone, Serialize)]
pub struct StartupBanner {
    /// Always `"startup"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Worker version.
    pub version: String,
    /// Capability identifiers the worker supports.
    pub capabilities: Vec<&'static str>,
    /// Always true once the banner is emitted.
    pub ready: bool,
}

impl StartupBanner {
    /// Banner for a worker version with the standard capability set.
    pub fn new(version: impl Into<String>) -> Self {
        StartupBanner {
            kind: "startup",
            version: version.into(),
            capabilities: vec!["guardTags", "linePermissions", "deltaUpdates", "themes"],
            ready: true,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_parses_without_payload() {
        let req: WorkerRequest =
            serde_json::from_value(json!({"id": "1", "command": "ping"})).unwrap();
        assert_eq!(req.id, "1");
        assert_eq!(req.command, "ping");
        assert!(req.payload.is_none());
    }

    #[test]
    fn success_response_omits_error_fields() {
        let resp = WorkerResponse::success("7", json!({"pong": true}));
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v, json!({"id": "7", "status": "success", "result": {"pong": true}}));
    }

    #[test]
    fn error_response_carries_code() {
        let resp = WorkerResponse::error("7", "no document has been set", NO_DOCUMENT);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["code"], "NO_DOCUMENT");
        assert!(v.get("result").is_none());
    }

    #[test]
    fn banner_shape() {
        let v = serde_json::to_value(StartupBanner::new("1.2.3")).unwrap();
        assert_eq!(v["type"], "startup");
        assert_eq!(v["ready"], true);
        assert_eq!(v["version"], "1.2.3");
        assert!(v["capabilities"].as_array().map(|c| !c.is_empty()).unwrap_or(false));
    }

    #[test]
    fn timed_response_includes_milliseconds() {
        let resp = WorkerResponse::success_timed("9", json!({}), 12);
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["timing"], 12);
    }
}
