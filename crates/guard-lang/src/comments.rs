//! Per-language comment-only line classification.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Comment syntax for one host language.
#[derive(Debug, Clone, Copy)]
pub struct CommentStyle {
    /// Prefixes that start a line comment, e.g. `//`, `#`, `--`.
    pub line_prefixes: &'static [&'static str],
    /// Block comment delimiter pairs, e.g. `("/*", "*/")`.
    pub block_delimiters: &'static [(&'static str, &'static str)],
    /// Docstring openers for indentation-significant languages.
    pub docstring_openers: &'static [&'static str],
}

const SLASH_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["//"],
    block_delimiters: &[("/*", "*/")],
    docstring_openers: &[],
};

const HASH_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["#"],
    block_delimiters: &[],
    docstring_openers: &[],
};

const PYTHON_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["#"],
    block_delimiters: &[("\"\"\"", "\"\"\""), ("'''", "'''")],
    docstring_openers: &["\"\"\"", "'''"],
};

const DASH_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["--"],
    block_delimiters: &[],
    docstring_openers: &[],
};

const LUA_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["--"],
    block_delimiters: &[("--[[", "]]")],
    docstring_openers: &[],
};

const MARKUP_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &[],
    block_delimiters: &[("<!--", "-->")],
    docstring_openers: &[],
};

const CSS_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &[],
    block_delimiters: &[("/*", "*/")],
    docstring_openers: &[],
};

/// Permissive style for unknown language ids: any common comment opener.
const DEFAULT_STYLE: CommentStyle = CommentStyle {
    line_prefixes: &["//", "#", "--"],
    block_delimiters: &[("/*", "*/"), ("<!--", "-->")],
    docstring_openers: &[],
};

static STYLES: Lazy<HashMap<&'static str, &'static CommentStyle>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static CommentStyle> = HashMap::new();
    for id in [
        "javascript",
        "javascriptreact",
        "typescript",
        "typescriptreact",
        "java",
        "c",
        "cpp",
        "csharp",
        "go",
        "rust",
        "swift",
        "kotlin",
        "scala",
        "php",
    ] {
        m.insert(id, &SLASH_STYLE);
    }
    m.insert("python", &PYTHON_STYLE);
    for id in ["ruby", "perl", "shellscript", "bash", "sh", "yaml", "toml", "r", "makefile"] {
        m.insert(id, &HASH_STYLE);
    }
    for id in ["sql", "haskell", "ada"] {
        m.insert(id, &DASH_STYLE);
    }
    m.insert("lua", &LUA_STYLE);
    for id in ["html", "xml", "markdown", "svg"] {
        m.insert(id, &MARKUP_STYLE);
    }
    m.insert("css", &CSS_STYLE);
    m
});

/// Comment style for a language id, falling back to a permissive default.
pub fn comment_style(language_id: &str) -> &'static CommentStyle {
    STYLES.get(language_id).copied().unwrap_or(&DEFAULT_STYLE)
}

/// Decide whether `line` is (only) a comment in the given language.
///
/// `in_block` is the paragraph state maintained by the caller across
/// successive lines: inside an open block comment every non-empty line is a
/// continuation and counts as a comment. An empty line is never a comment.
pub fn is_comment_only(line: &str, language_id: &str, in_block: bool) -> bool {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return false;
    }
    if in_block {
        return true;
    }
    let style = comment_style(language_id);
    if style.line_prefixes.iter().any(|p| trimmed.starts_with(p)) {
        return true;
    }
    for (open, close) in style.block_delimiters {
        if let Some(rest) = trimmed.strip_prefix(open) {
            // Single-line block comment, or the opener of a multi-line one.
            // Anything after the closer disqualifies the line.
            return match rest.find(close) {
                Some(at) => rest[at + close.len()..].trim().is_empty(),
                None => true,
            };
        }
    }
    // Continuation lines of `/* ... */` blocks conventionally start with `*`.
    if style.block_delimiters.iter().any(|(open, _)| *open == "/*") && trimmed.starts_with('*') {
        return true;
    }
    false
}

/// Advance the block-comment paragraph state across one line.
///
/// Returns the state that applies to the line *after* this one.
pub fn update_block_state(line: &str, language_id: &str, in_block: bool) -> bool {
    let style = comment_style(language_id);
    let mut state = in_block;
    let mut rest = line;
    loop {
        if state {
            let close = style
                .block_delimiters
                .iter()
                .filter_map(|(_, close)| rest.find(close).map(|at| (at, close.len())))
                .min();
            match close {
                Some((at, len)) => {
                    rest = &rest[at + len..];
                    state = false;
                }
                None => return true,
            }
        } else {
            let open = style
                .block_delimiters
                .iter()
                .filter_map(|(open, close)| rest.find(open).map(|at| (at, open.len(), *close)))
                .min_by_key(|&(at, _, _)| at);
            match open {
                Some((at, len, _)) => {
                    rest = &rest[at + len..];
                    state = true;
                }
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_comments() {
        assert!(is_comment_only("// hello", "javascript", false));
        assert!(is_comment_only("   // indented", "rust", false));
        assert!(!is_comment_only("let x = 1; // trailing", "javascript", false));
    }

    #[test]
    fn hash_comments() {
        assert!(is_comment_only("# note", "python", false));
        assert!(is_comment_only("# note", "ruby", false));
        assert!(!is_comment_only("x = 1  # trailing", "python", false));
    }

    #[test]
    fn dash_comments() {
        assert!(is_comment_only("-- select", "sql", false));
        assert!(!is_comment_only("SELECT 1 -- trailing", "sql", false));
    }

    #[test]
    fn empty_line_is_not_a_comment() {
        assert!(!is_comment_only("", "python", false));
        assert!(!is_comment_only("   ", "javascript", false));
        assert!(!is_comment_only("", "javascript", true));
    }

    #[test]
    fn single_line_block_comment() {
        assert!(is_comment_only("/* boxed */", "c", false));
        assert!(is_comment_only("<!-- note -->", "html", false));
        assert!(!is_comment_only("/* lead */ int x;", "c", false));
    }

    #[test]
    fn block_opener_counts_as_comment() {
        assert!(is_comment_only("/* start of a long", "c", false));
        assert!(is_comment_only(" * middle", "c", false));
    }

    #[test]
    fn paragraph_state_marks_continuations() {
        assert!(is_comment_only("plain words inside a block", "c", true));
        assert!(!is_comment_only("plain words", "c", false));
    }

    #[test]
    fn block_state_tracking() {
        assert!(update_block_state("/* open", "c", false));
        assert!(update_block_state("still inside", "c", true));
        assert!(!update_block_state("done */", "c", true));
        assert!(!update_block_state("/* both */", "c", false));
        assert!(update_block_state("/* a */ /* b", "c", false));
    }

    #[test]
    fn python_docstring_state() {
        assert!(update_block_state("\"\"\" docs", "python", false));
        assert!(!update_block_state("end \"\"\"", "python", true));
        assert!(is_comment_only("\"\"\"one-liner\"\"\"", "python", false));
    }

    #[test]
    fn unknown_language_uses_permissive_default() {
        assert!(is_comment_only("// c-ish", "plaintext", false));
        assert!(is_comment_only("# hash-ish", "plaintext", false));
    }
}
