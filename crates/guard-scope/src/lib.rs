//! Semantic scope resolution for guard tags.
//!
//! Two resolvers share one contract: given a document, the guard's line, and
//! a semantic scope name, compute the inclusive 1-based line range the scope
//! covers, or nothing. [`resolve_with_ast`] parses the document with
//! tree-sitter and walks the tree; [`resolve_with_patterns`] approximates the
//! same answer from regexes and indentation when no grammar is available or
//! the parse fails. Callers chain them; neither knows about the other.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod fallback;
mod grammars;

pub use ast::resolve_with_ast;
pub use fallback::resolve_with_patterns;
pub use grammars::has_grammar;

/// Inclusive, 1-based line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First covered line.
    pub start: usize,
    /// Last covered line.
    pub end: usize,
}

impl LineRange {
    /// Construct a range, callers guarantee `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        LineRange { start, end }
    }
}

/// The run of consecutive non-blank, non-guard lines after `guard_line`.
///
/// Covers the guard line itself; terminates at the first blank line, a line
/// containing another `@guard:`, or EOF. Returns `None` when the run is
/// empty (the next line is already blank or EOF).
pub(crate) fn consecutive_run(lines: &[&str], guard_line: usize) -> Option<LineRange> {
    let mut end = guard_line;
    for (idx, line) in lines.iter().enumerate().skip(guard_line) {
        if line.trim().is_empty() || line.to_ascii_lowercase().contains("@guard:") {
            break;
        }
        end = idx + 1;
    }
    (end > guard_line).then_some(LineRange::new(guard_line, end))
}
