//! Rope-backed single-document store with versioned delta edits.
//!
//! The store owns at most one document at a time. `set_document` replaces the
//! whole state; `apply_delta` applies ordered ranged edits whose declared
//! version must be exactly one above the current version. Edit positions are
//! 0-based line/character pairs with UTF-16 character columns, half-open at
//! the end position. Any validation failure leaves the store untouched.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use ropey::Rope;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the document store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// A delta arrived before any document was set.
    #[error("no document has been set")]
    NoDocument,
    /// The delta's declared version is not current + 1.
    #[error("version mismatch: expected {expected}, got {declared}")]
    VersionMismatch {
        /// The version the store would accept.
        expected: i64,
        /// The version the delta declared.
        declared: i64,
    },
    /// A change range does not lie within the document.
    #[error("invalid range at change {index}: {reason}")]
    InvalidRange {
        /// Index of the offending change within the request.
        index: usize,
        /// Human-readable cause.
        reason: String,
    },
}

impl DocumentError {
    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentError::NoDocument => "NO_DOCUMENT",
            DocumentError::VersionMismatch { .. } | DocumentError::InvalidRange { .. } => {
                "INVALID_DELTA"
            }
        }
    }
}

/// One ranged edit inside an `applyDelta` request.
///
/// Coordinates are 0-based; `start`/`end` form a half-open range and
/// characters count UTF-16 code units, the convention of the editors this
/// worker serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaChange {
    /// First line of the replaced range.
    pub start_line: usize,
    /// Column of the range start, UTF-16 units.
    pub start_char: usize,
    /// Line of the (exclusive) range end.
    pub end_line: usize,
    /// Column of the range end, UTF-16 units.
    pub end_char: usize,
    /// Replacement text.
    pub new_text: String,
}

/// Immutable view of the stored document handed to the guard processor.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// File name as given by the client, informational only.
    pub file_name: String,
    /// Host language identifier.
    pub language_id: String,
    /// Full document text.
    pub text: String,
    /// Current version.
    pub version: i64,
}

struct StoredDocument {
    file_name: String,
    language_id: String,
    rope: Rope,
    version: i64,
}

/// Holder of exactly one document plus its version counter.
#[derive(Default)]
pub struct DocumentStore {
    doc: Option<StoredDocument>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        DocumentStore::default()
    }

    /// Replace the document state atomically.
    ///
    /// The declared version becomes authoritative; it does not have to be 1.
    pub fn set_document(&mut self, file_name: &str, language_id: &str, content: &str, version: i64) {
        self.doc = Some(StoredDocument {
            file_name: file_name.to_string(),
            language_id: language_id.to_string(),
            rope: Rope::from_str(content),
            version,
        });
    }

    /// Apply a delta whose version must equal the current version + 1.
    ///
    /// Changes are applied in order, each against the result of its
    /// predecessors. On any failure the stored text and version are
    /// unchanged.
    pub fn apply_delta(&mut self, version: i64, changes: &[DeltaChange]) -> Result<(), DocumentError> {
        let doc = self.doc.as_mut().ok_or(DocumentError::NoDocument)?;
        let expected = doc.version + 1;
        if version != expected {
            return Err(DocumentError::VersionMismatch { expected, declared: version });
        }

        // Edit a scratch rope so a failing change cannot leave partial state.
        let mut rope = doc.rope.clone();
        for (index, change) in changes.iter().enumerate() {
            apply_change(&mut rope, change, index)?;
        }
        doc.rope = rope;
        doc.version = version;
        Ok(())
    }

    /// Current version, if a document is set.
    pub fn version(&self) -> Option<i64> {
        self.doc.as_ref().map(|d| d.version)
    }

    /// Snapshot the current document for processing.
    pub fn snapshot(&self) -> Option<DocumentSnapshot> {
        self.doc.as_ref().map(|d| DocumentSnapshot {
            file_name: d.file_name.clone(),
            language_id: d.language_id.clone(),
            text: d.rope.to_string(),
            version: d.version,
        })
    }
}

fn apply_change(rope: &mut Rope, change: &DeltaChange, index: usize) -> Result<(), DocumentError> {
    let invalid = |reason: &str| DocumentError::InvalidRange { index, reason: reason.to_string() };

    if (change.start_line, change.start_char) > (change.end_line, change.end_char) {
        return Err(invalid("start position is after end position"));
    }
    let start = pos_to_char(rope, change.start_line, change.start_char)
        .ok_or_else(|| invalid("start position is outside the document"))?;
    let end = pos_to_char(rope, change.end_line, change.end_char)
        .ok_or_else(|| invalid("end position is outside the document"))?;

    rope.remove(start..end);
    rope.insert(start, &change.new_text);
    Ok(())
}

/// Convert a 0-based line / UTF-16 column pair to a rope char index.
///
/// Returns `None` for positions outside the document, past the end of the
/// line's content, or splitting a surrogate pair.
fn pos_to_char(rope: &Rope, line: usize, character: usize) -> Option<usize> {
    if line >= rope.len_lines() {
        return None;
    }
    let line_start = rope.line_to_char(line);
    let slice = rope.line(line);

    let mut units = 0usize;
    let mut chars = 0usize;
    for ch in slice.chars() {
        if units == character {
            return Some(line_start + chars);
        }
        if ch == '\n' || ch == '\r' {
            // The column points past the line's content.
            return None;
        }
        let width = ch.len_utf16();
        if units + width > character {
            // The column splits a surrogate pair.
            return None;
        }
        units += width;
        chars += 1;
    }
    (units == character).then_some(line_start + chars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn change(sl: usize, sc: usize, el: usize, ec: usize, text: &str) -> DeltaChange {
        DeltaChange {
            start_line: sl,
            start_char: sc,
            end_line: el,
            end_char: ec,
            new_text: text.to_string(),
        }
    }

    fn text_of(store: &DocumentStore) -> String {
        store.snapshot().map(|s| s.text).unwrap_or_default()
    }

    #[test]
    fn set_document_is_authoritative() {
        let mut store = DocumentStore::new();
        store.set_document("a.py", "python", "x = 1\n", 7);
        assert_eq!(store.version(), Some(7));
        assert_eq!(text_of(&store), "x = 1\n");
    }

    #[test]
    fn delta_before_document_fails() {
        let mut store = DocumentStore::new();
        let err = store.apply_delta(1, &[]);
        assert_eq!(err, Err(DocumentError::NoDocument));
    }

    #[test]
    fn empty_delta_bumps_version_only() {
        let mut store = DocumentStore::new();
        store.set_document("a.py", "python", "x = 1\n", 1);
        assert_eq!(store.apply_delta(2, &[]), Ok(()));
        assert_eq!(store.version(), Some(2));
        assert_eq!(text_of(&store), "x = 1\n");
    }

    #[test]
    fn version_gap_is_rejected_and_state_unchanged() {
        let mut store = DocumentStore::new();
        store.set_document("a.py", "python", "x = 1\n", 1);
        let err = store.apply_delta(3, &[change(0, 0, 0, 1, "y")]);
        assert_eq!(err, Err(DocumentError::VersionMismatch { expected: 2, declared: 3 }));
        assert_eq!(store.version(), Some(1));
        assert_eq!(text_of(&store), "x = 1\n");
    }

    #[test]
    fn single_line_replacement() {
        let mut store = DocumentStore::new();
        store.set_document("a.rs", "rust", "let x = 1;\n", 1);
        store.apply_delta(2, &[change(0, 4, 0, 5, "y")]).ok();
        assert_eq!(text_of(&store), "let y = 1;\n");
    }

    #[test]
    fn multi_line_deletion_joins_lines() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "one\ntwo\nthree\n", 1);
        store.apply_delta(2, &[change(0, 3, 1, 3, "")]).ok();
        assert_eq!(text_of(&store), "one\nthree\n");
    }

    #[test]
    fn changes_apply_in_order_against_prior_results() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "ab\n", 1);
        let changes =
            vec![change(0, 1, 0, 1, "X"), change(0, 2, 0, 2, "Y")];
        assert_eq!(store.apply_delta(2, &changes), Ok(()));
        assert_eq!(text_of(&store), "aXYb\n");
    }

    #[test]
    fn out_of_range_line_fails_atomically() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "ab\n", 1);
        let changes = vec![change(0, 0, 0, 1, "z"), change(9, 0, 9, 0, "w")];
        let err = store.apply_delta(2, &changes);
        assert!(matches!(err, Err(DocumentError::InvalidRange { index: 1, .. })));
        assert_eq!(text_of(&store), "ab\n");
        assert_eq!(store.version(), Some(1));
    }

    #[test]
    fn out_of_range_column_fails() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "ab\ncd\n", 1);
        let err = store.apply_delta(2, &[change(0, 5, 0, 5, "z")]);
        assert!(matches!(err, Err(DocumentError::InvalidRange { index: 0, .. })));
    }

    #[test]
    fn inverted_range_fails() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "abc\n", 1);
        let err = store.apply_delta(2, &[change(0, 2, 0, 1, "z")]);
        assert!(matches!(err, Err(DocumentError::InvalidRange { index: 0, .. })));
    }

    #[test]
    fn utf16_columns_count_code_units() {
        let mut store = DocumentStore::new();
        // '😀' is two UTF-16 code units.
        store.set_document("a.txt", "plaintext", "a😀b\n", 1);
        assert_eq!(store.apply_delta(2, &[change(0, 3, 0, 4, "X")]), Ok(()));
        assert_eq!(text_of(&store), "a😀X\n");
    }

    #[test]
    fn splitting_a_surrogate_pair_fails() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "a😀b\n", 1);
        let err = store.apply_delta(2, &[change(0, 2, 0, 2, "X")]);
        assert!(matches!(err, Err(DocumentError::InvalidRange { .. })));
    }

    #[test]
    fn insert_at_end_of_document() {
        let mut store = DocumentStore::new();
        store.set_document("a.txt", "plaintext", "ab", 1);
        assert_eq!(store.apply_delta(2, &[change(0, 2, 0, 2, "!")]), Ok(()));
        assert_eq!(text_of(&store), "ab!");
    }

    #[test]
    fn delta_change_wire_shape() {
        let parsed: Result<DeltaChange, _> = serde_json::from_value(serde_json::json!({
            "startLine": 1, "startChar": 2, "endLine": 3, "endChar": 4, "newText": "hi"
        }));
        assert_eq!(parsed.ok(), Some(change(1, 2, 3, 4, "hi")));
    }
}
