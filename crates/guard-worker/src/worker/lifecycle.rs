//! Lifecycle command handlers: `version`, `ping`, `shutdown`.

use super::{CommandError, CommandResult, GuardWorker, MIN_COMPATIBLE, VERSION};
use guard_worker_protocol::{PARSE_ERROR, PingResult, VersionResult};
use serde_json::json;

impl GuardWorker {
    /// Handle `version`: report the worker version and the compatibility
    /// verdict for any `--min-version` floor the client requested.
    pub(crate) fn handle_version(&self) -> CommandResult {
        let compatible = self.floor_satisfied();
        let result = VersionResult {
            version: VERSION.to_string(),
            min_compatible: MIN_COMPATIBLE.to_string(),
            compatible,
        };
        serde_json::to_value(result)
            .map_err(|e| CommandError::new(format!("failed to encode result: {}", e), PARSE_ERROR))
    }

    /// Handle `ping`.
    pub(crate) fn handle_ping(&self) -> CommandResult {
        let uptime = self.started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;
        let result = PingResult { pong: true, uptime };
        serde_json::to_value(result)
            .map_err(|e| CommandError::new(format!("failed to encode result: {}", e), PARSE_ERROR))
    }

    /// Handle `shutdown`: the response is flushed, then the loop exits.
    pub(crate) fn handle_shutdown(&mut self) -> CommandResult {
        self.request_shutdown();
        Ok(json!({ "message": "shutting down" }))
    }
}
