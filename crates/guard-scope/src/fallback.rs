//! Regex and indentation based scope resolution.
//!
//! Used when no grammar is bundled for a language or the AST route came up
//! empty. Header lines are matched per language; endings come from
//! indentation (Python) or `{`/`}` nesting (brace languages).

use crate::{LineRange, consecutive_run};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

struct Compiled {
    function: Option<Regex>,
    class: Option<Regex>,
    indent_based: bool,
}

fn compile(function: &str, class: &str, indent_based: bool) -> Compiled {
    Compiled {
        function: Regex::new(function).ok(),
        class: Regex::new(class).ok(),
        indent_based,
    }
}

static PATTERNS: Lazy<HashMap<&'static str, Compiled>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "python",
        compile(r"^\s*(async\s+)?def\s+\w+", r"^\s*class\s+\w+", true),
    );
    let js_function = r"^\s*(export\s+)?(default\s+)?(async\s+)?function\b|^\s*[\w$]+\s*[:=]\s*(async\s*)?\([^)]*\)\s*=>|^\s*(public|private|protected|static|async|get|set)?\s*[\w$]+\s*\([^;]*\)\s*\{";
    let js_class = r"^\s*(export\s+)?(default\s+)?(abstract\s+)?class\s+\w+";
    m.insert("javascript", compile(js_function, js_class, false));
    m.insert("typescript", compile(js_function, js_class, false));
    m.insert(
        "rust",
        compile(
            r"^\s*(pub(\([^)]*\))?\s+)?(const\s+)?(async\s+)?(unsafe\s+)?fn\s+\w+",
            r"^\s*(pub(\([^)]*\))?\s+)?(struct|enum|trait|impl)\b",
            false,
        ),
    );
    m.insert("go", compile(r"^\s*func\b", r"^\s*type\s+\w+", false));
    m.insert(
        "java",
        compile(
            r"^\s*(public|private|protected)?\s*(static\s+)?(final\s+)?[\w<>\[\],\s]+\s+\w+\s*\([^;]*\)\s*\{?",
            r"^\s*(public|private|protected)?\s*(abstract\s+)?(final\s+)?(class|interface|enum)\s+\w+",
            false,
        ),
    );
    let c_function = r"^[A-Za-z_][\w\s\*:<>,~]*\([^;]*\)\s*\{?\s*$";
    let c_class = r"^\s*(typedef\s+)?(struct|union|enum|class)\b";
    m.insert("c", compile(c_function, c_class, false));
    m.insert("cpp", compile(c_function, c_class, false));
    m
});

static DEFAULT_PATTERNS: Lazy<Compiled> = Lazy::new(|| {
    compile(r"^\s*(def|function|fn|func|sub)\s+\w+", r"^\s*class\s+\w+", false)
});

fn patterns(language_id: &str) -> &'static Compiled {
    let key = match language_id {
        "javascriptreact" => "javascript",
        "typescriptreact" => "typescript",
        other => other,
    };
    PATTERNS.get(key).unwrap_or_else(|| &*DEFAULT_PATTERNS)
}

/// Resolve a semantic scope from text patterns alone.
///
/// Same contract as [`crate::resolve_with_ast`]; returns `None` when no
/// header can be located, leaving the caller to self-scope the tag.
pub fn resolve_with_patterns(
    source: &str,
    language_id: &str,
    guard_line: usize,
    scope: &str,
) -> Option<LineRange> {
    let lines: Vec<&str> = source.lines().collect();
    if guard_line == 0 || guard_line > lines.len() {
        return None;
    }
    let guard_row = guard_line - 1;
    let pats = patterns(language_id);

    match scope {
        "function" | "class" => {
            let re = if scope == "function" { pats.function.as_ref() } else { pats.class.as_ref() }?;
            let header = find_header(&lines, guard_row, re, pats.indent_based)?;
            let end = scope_end(&lines, header, pats.indent_based);
            Some(LineRange::new(guard_line, (end + 1).max(guard_line)))
        }
        "signature" => {
            let re = pats.function.as_ref()?;
            let header = find_header(&lines, guard_row, re, pats.indent_based)?;
            let end = signature_end(&lines, header, pats.indent_based);
            Some(LineRange::new(header + 1, end + 1))
        }
        "body" => {
            let re = pats.function.as_ref()?;
            let header = find_header(&lines, guard_row, re, pats.indent_based)?;
            body_range(&lines, header, pats.indent_based)
        }
        "block" => {
            let enclosing = enclosing_header(&lines, guard_row, pats);
            match enclosing {
                Some(header) => {
                    let end = scope_end(&lines, header, pats.indent_based);
                    Some(LineRange::new(guard_line, (end + 1).max(guard_line)))
                }
                None => consecutive_run(&lines, guard_line),
            }
        }
        "statement" => {
            let next = (guard_row + 1..lines.len()).find(|&row| !lines[row].trim().is_empty())?;
            Some(LineRange::new(guard_line, next + 1))
        }
        _ => None,
    }
}

/// Nearest header: first match below the guard, else an enclosing one above.
fn find_header(lines: &[&str], guard_row: usize, re: &Regex, indent_based: bool) -> Option<usize> {
    if let Some(row) = (guard_row + 1..lines.len()).find(|&row| re.is_match(lines[row])) {
        return Some(row);
    }
    (0..=guard_row).rev().find(|&row| {
        re.is_match(lines[row]) && scope_end(lines, row, indent_based) >= guard_row
    })
}

/// Function or class header above the guard whose scope still covers it.
fn enclosing_header(lines: &[&str], guard_row: usize, pats: &Compiled) -> Option<usize> {
    (0..=guard_row).rev().find(|&row| {
        let headerish = pats.function.as_ref().map(|re| re.is_match(lines[row])).unwrap_or(false)
            || pats.class.as_ref().map(|re| re.is_match(lines[row])).unwrap_or(false);
        headerish && row < guard_row && scope_end(lines, row, pats.indent_based) >= guard_row
    })
}

/// Last row belonging to the construct whose header is at `header`.
fn scope_end(lines: &[&str], header: usize, indent_based: bool) -> usize {
    if indent_based {
        let base = indent_width(lines[header]);
        let mut end = header;
        for (row, line) in lines.iter().enumerate().skip(header + 1) {
            if line.trim().is_empty() {
                continue;
            }
            if indent_width(line) > base {
                end = row;
            } else {
                break;
            }
        }
        end
    } else {
        let mut depth = 0i32;
        let mut opened = false;
        for (row, line) in lines.iter().enumerate().skip(header) {
            for ch in line.chars() {
                match ch {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            if opened && depth <= 0 {
                return row;
            }
            if !opened && row > header + 1 {
                break;
            }
        }
        header
    }
}

/// Last header line: the `:` line for indentation languages, the line before
/// the opening `{` (or the header itself when the brace shares its line).
fn signature_end(lines: &[&str], header: usize, indent_based: bool) -> usize {
    if indent_based {
        for (row, line) in lines.iter().enumerate().skip(header) {
            if line.trim_end().ends_with(':') {
                return row;
            }
        }
        header
    } else {
        if lines[header].contains('{') {
            return header;
        }
        for (row, line) in lines.iter().enumerate().skip(header + 1) {
            if line.contains('{') {
                return row.saturating_sub(1);
            }
        }
        header
    }
}

fn body_range(lines: &[&str], header: usize, indent_based: bool) -> Option<LineRange> {
    let end = scope_end(lines, header, indent_based);
    if indent_based {
        let sig = signature_end(lines, header, true);
        (sig < end).then(|| LineRange::new(sig + 2, end + 1))
    } else {
        let open = (header..=end).find(|&row| lines[row].contains('{'))?;
        if end > open + 1 {
            Some(LineRange::new(open + 2, end))
        } else {
            Some(LineRange::new(open + 1, end + 1))
        }
    }
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).map(|c| if c == '\t' { 4 } else { 1 }).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn python_function_by_indentation() {
        let src = "# @guard:ai:n.function\ndef f():\n    a = 1\n    return a\ng = 2\n";
        let range = resolve_with_patterns(src, "python", 1, "function");
        assert_eq!(range, Some(LineRange::new(1, 4)));
    }

    #[test]
    fn python_nested_blank_lines_stay_inside() {
        let src = "# @guard:ai:r.function\ndef f():\n    a = 1\n\n    return a\ng = 2\n";
        let range = resolve_with_patterns(src, "python", 1, "function");
        assert_eq!(range, Some(LineRange::new(1, 5)));
    }

    #[test]
    fn brace_function_end() {
        let src = "// @guard:ai:r.function\nfunction f() {\n  if (x) {\n  }\n}\nrest();\n";
        let range = resolve_with_patterns(src, "javascript", 1, "function");
        assert_eq!(range, Some(LineRange::new(1, 5)));
    }

    #[test]
    fn rust_function_header() {
        let src = "// @guard:ai:w.func\npub fn run() {\n    work();\n}\n";
        let range = resolve_with_patterns(src, "rust", 1, "function");
        assert_eq!(range, Some(LineRange::new(1, 4)));
    }

    #[test]
    fn signature_brace_same_line() {
        let src = "// @guard:ai:r.sig\nfunction f(a, b) {\n  return a;\n}\n";
        let range = resolve_with_patterns(src, "javascript", 1, "signature");
        assert_eq!(range, Some(LineRange::new(2, 2)));
    }

    #[test]
    fn python_signature_multiline() {
        let src = "# @guard:ai:r.sig\ndef f(\n    a,\n):\n    return a\n";
        let range = resolve_with_patterns(src, "python", 1, "signature");
        assert_eq!(range, Some(LineRange::new(2, 4)));
    }

    #[test]
    fn python_body_is_the_indented_suite() {
        let src = "# @guard:ai:w.body\ndef f():\n    a = 1\n    return a\n";
        let range = resolve_with_patterns(src, "python", 1, "body");
        assert_eq!(range, Some(LineRange::new(3, 4)));
    }

    #[test]
    fn brace_body_trims_delimiters() {
        let src = "// @guard:ai:w.body\nfunction f()\n{\n  work();\n}\n";
        let range = resolve_with_patterns(src, "javascript", 1, "body");
        assert_eq!(range, Some(LineRange::new(4, 4)));
    }

    #[test]
    fn block_without_context_is_the_run() {
        let src = "# @guard:ai:r\nA = 1\nB = 2\n\nC = 3\n";
        let range = resolve_with_patterns(src, "python", 1, "block");
        assert_eq!(range, Some(LineRange::new(1, 3)));
    }

    #[test]
    fn block_inside_function_extends_to_its_end() {
        let src = "def f():\n    a = 1\n    # @guard:ai:r\n    b = 2\n    return b\ng = 1\n";
        let range = resolve_with_patterns(src, "python", 3, "block");
        assert_eq!(range, Some(LineRange::new(3, 5)));
    }

    #[test]
    fn enclosing_function_found_above_guard() {
        let src = "fn outer() {\n    // @guard:ai:r.function\n    work();\n}\n";
        let range = resolve_with_patterns(src, "rust", 2, "function");
        assert_eq!(range, Some(LineRange::new(2, 4)));
    }

    #[test]
    fn unknown_scope_is_none() {
        assert_eq!(resolve_with_patterns("x\n", "python", 1, "docstring"), None);
    }
}
