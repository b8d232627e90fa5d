//! Document command handlers.

use super::{CommandError, CommandResult, GuardWorker, parse_payload};
use guard_worker_protocol::{
    ApplyDeltaPayload, DocumentResult, INVALID_DELTA, INVALID_JSON, NO_DOCUMENT, PARSE_ERROR,
    SetDocumentPayload,
};

impl GuardWorker {
    /// Handle `setDocument`: replace state and analyze the new text.
    pub(crate) fn handle_set_document(&mut self, payload: Option<serde_json::Value>) -> CommandResult {
        let p: SetDocumentPayload = parse_payload(payload, INVALID_JSON)?;
        self.documents.set_document(&p.file_name, &p.language_id, &p.content, p.version);
        self.analyze()
    }

    /// Handle `applyDelta`: apply versioned edits and re-analyze.
    pub(crate) fn handle_apply_delta(&mut self, payload: Option<serde_json::Value>) -> CommandResult {
        let p: ApplyDeltaPayload = parse_payload(payload, INVALID_DELTA)?;
        self.documents.apply_delta(p.version, &p.changes)?;
        self.analyze()
    }

    /// Run the guard processor over the current document.
    fn analyze(&self) -> CommandResult {
        let snapshot = self
            .documents
            .snapshot()
            .ok_or_else(|| CommandError::new("no document has been set", NO_DOCUMENT))?;
        let guard_tags = guard_processor::parse(&snapshot.text, &snapshot.language_id);
        let total_lines = snapshot.text.lines().count();
        let line_permissions = guard_processor::permissions(total_lines, &guard_tags);

        let result =
            DocumentResult { guard_tags, line_permissions, document_version: snapshot.version };
        serde_json::to_value(result)
            .map_err(|e| CommandError::new(format!("failed to encode result: {}", e), PARSE_ERROR))
    }
}
