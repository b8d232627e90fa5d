//! Guard processing: walk a document, attach scopes, evaluate permissions.
//!
//! [`parse`] recognizes every guard tag in a document and attaches the
//! resolved `[scope_start, scope_end]` range to each: line counts directly,
//! context tags through the documentation run that follows them, semantic
//! scopes through the AST resolver with the pattern resolver as fallback.
//! [`permissions`] then replays the tags over the document with a stack of
//! active guards and emits one [`LinePermission`] per line.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod stack;

use guard_lang::{is_comment_only, update_block_state};
use guard_scope::{LineRange, resolve_with_ast, resolve_with_patterns};
use guard_tag::{GuardTag, recognize_line};

pub use guard_tag::LinePermission;
pub use stack::permissions;

/// Recognize and scope-resolve every guard tag in the document.
///
/// Tags are returned in line order, one per declaration line. Malformed
/// annotations are skipped silently; a tag whose scope cannot be resolved is
/// degraded to cover its own line only.
pub fn parse(text: &str, language_id: &str) -> Vec<GuardTag> {
    let lines: Vec<&str> = text.lines().collect();
    let comment_only = classify_lines(&lines, language_id);

    let mut tags = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(mut tag) = recognize_line(line) {
            tag.line_number = idx + 1;
            resolve_range(&mut tag, text, &lines, &comment_only, language_id);
            tags.push(tag);
        }
    }
    tags
}

/// Comment-only classification for every line, carrying block-comment
/// paragraph state across the document.
fn classify_lines(lines: &[&str], language_id: &str) -> Vec<bool> {
    let mut flags = Vec::with_capacity(lines.len());
    let mut in_block = false;
    for line in lines {
        flags.push(is_comment_only(line, language_id, in_block));
        in_block = update_block_state(line, language_id, in_block);
    }
    flags
}

fn resolve_range(
    tag: &mut GuardTag,
    text: &str,
    lines: &[&str],
    comment_only: &[bool],
    language_id: &str,
) {
    let total = lines.len();
    let line = tag.line_number;

    if let Some(count) = tag.line_count {
        tag.scope_start = Some(line);
        tag.scope_end = Some((line + count - 1).min(total));
        return;
    }

    let context_scoped = tag.scope.as_deref() == Some("context")
        || (tag.is_context() && tag.scope.is_none());
    if context_scoped {
        let run_end = documentation_run_end(lines, comment_only, line);
        tag.scope_start = Some(line + 1);
        tag.scope_end = Some(run_end);
        return;
    }

    let scope = tag.scope.clone().unwrap_or_else(|| "block".to_string());
    let range = resolve_with_ast(text, language_id, line, &scope)
        .or_else(|| resolve_with_patterns(text, language_id, line, &scope))
        .unwrap_or(LineRange::new(line, line));
    tag.scope = Some(scope);
    tag.scope_start = Some(range.start.max(1));
    tag.scope_end = Some(range.end.min(total.max(1)));
}

/// Last line of the documentation run starting below a context guard.
///
/// The run is the contiguous stretch of comment-only lines; blank lines are
/// tolerated but do not extend it, and another guard or any code line ends
/// it. The result is the last line with actual comment content, which can be
/// the guard line itself when the run is empty.
fn documentation_run_end(lines: &[&str], comment_only: &[bool], guard_line: usize) -> usize {
    let mut end = guard_line;
    for idx in guard_line..lines.len() {
        let line = lines[idx];
        if line.to_ascii_lowercase().contains("@guard:") {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        if comment_only.get(idx).copied().unwrap_or(false) {
            end = idx + 1;
        } else {
            break;
        }
    }
    end
}
