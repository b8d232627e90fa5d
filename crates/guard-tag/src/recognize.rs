//! Single-line guard tag recognition.
//!
//! The recognizer scans a line for `@guard:` occurrences and parses each into
//! target/permission groups. It is deliberately forgiving: anything that does
//! not match the surface syntax yields no tag rather than an error, and the
//! recognizer has no idea whether the line is a comment (the processor pairs
//! it with the comment classifier for that).

use crate::{GuardTag, Permission, Target, normalize_scope};
use regex::Regex;
use std::sync::OnceLock;

static GUARD_TOKEN_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static GROUP_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static TAIL_IF_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static TAIL_SCOPE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static TAIL_ADD_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static TAIL_REMOVE_RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn guard_token_re() -> Option<&'static Regex> {
    GUARD_TOKEN_RE.get_or_init(|| Regex::new(r"(?i)@guard:")).as_ref().ok()
}

fn group_re() -> Option<&'static Regex> {
    GROUP_RE
        .get_or_init(|| {
            Regex::new(
                r"(?i)^(?P<targets>(?:ai|human|hu|all)(?:\s*,\s*(?:ai|human|hu|all))*)(?:\[(?P<id>[^\]]*)\])?:(?P<perm>context|read-only|readonly|read|write|noaccess|none|r|w|n)\b(?::(?P<ctx>read|write|r|w)\b)?(?:\[(?P<meta>[^\]]*)\])?",
            )
        })
        .as_ref()
        .ok()
}

fn tail_if_re() -> Option<&'static Regex> {
    TAIL_IF_RE.get_or_init(|| Regex::new(r"(?i)^\.if\((?P<cond>[^)]*)\)")).as_ref().ok()
}

fn tail_scope_re() -> Option<&'static Regex> {
    TAIL_SCOPE_RE
        .get_or_init(|| Regex::new(r"(?i)^\.(?P<name>[0-9]+|[a-z_][a-z0-9_]*)"))
        .as_ref()
        .ok()
}

fn tail_add_re() -> Option<&'static Regex> {
    TAIL_ADD_RE.get_or_init(|| Regex::new(r"(?i)^\+(?P<name>[a-z_][a-z0-9_]*)")).as_ref().ok()
}

fn tail_remove_re() -> Option<&'static Regex> {
    TAIL_REMOVE_RE.get_or_init(|| Regex::new(r"(?i)^-(?P<name>[a-z_][a-z0-9_]*)")).as_ref().ok()
}

/// The permission of one target/permission group before distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupPermission {
    Explicit(Permission),
    /// `context`, optionally promoted to writable by a `:w` modifier.
    Context { writable: bool },
}

/// One parsed `TARGET(,TARGET)*:PERMISSION…` group plus consumed byte length.
struct TagGroup {
    targets: Vec<Target>,
    identifier: Option<String>,
    permission: GroupPermission,
    metadata: Option<String>,
    scope: Option<String>,
    line_count: Option<usize>,
    condition: Option<String>,
    add_scopes: Vec<String>,
    remove_scopes: Vec<String>,
    consumed: usize,
}

/// Recognize every guard tag on a line, merged into one descriptor.
///
/// Returns `None` when the line carries no `@guard:` token or nothing after
/// one parses. Conflicts on the same target resolve right-most-wins; `all`
/// distributes to both targets. `line_number` on the returned tag is left at
/// zero for the caller to fill in.
pub fn recognize_line(line: &str) -> Option<GuardTag> {
    let token_re = guard_token_re()?;
    let mut tag = GuardTag::default();
    let mut matched = false;
    let mut pos = 0usize;

    for token in token_re.find_iter(line) {
        if token.start() < pos {
            continue;
        }
        let mut cursor = token.end();
        loop {
            let Some(group) = parse_group(&line[cursor..]) else {
                break;
            };
            cursor += group.consumed;
            apply_group(&mut tag, &group);
            matched = true;

            // Additional comma-separated groups share the `@guard:` prefix,
            // e.g. `@guard:ai:r,human:w`.
            let rest = &line[cursor..];
            let after_comma = rest.strip_prefix(',').map(|r| r.trim_start());
            match after_comma {
                Some(next) => cursor = line.len() - next.len(),
                None => break,
            }
        }
        pos = cursor;
    }

    (matched && tag.has_any_directive()).then_some(tag)
}

/// Parse one group at the start of `rest`, tail segments included.
fn parse_group(rest: &str) -> Option<TagGroup> {
    let caps = group_re()?.captures(rest)?;
    let whole = caps.get(0)?;

    let targets = parse_targets(caps.name("targets")?.as_str());
    // Identifiers compare case-insensitively, metadata is carried verbatim.
    let identifier = caps.name("id").map(|m| m.as_str().to_ascii_lowercase());
    let metadata = caps.name("meta").map(|m| m.as_str().to_string());
    let permission = parse_permission(
        &caps.name("perm")?.as_str().to_ascii_lowercase(),
        caps.name("ctx").map(|m| m.as_str().to_ascii_lowercase()),
    )?;

    let mut group = TagGroup {
        targets,
        identifier,
        permission,
        metadata,
        scope: None,
        line_count: None,
        condition: None,
        add_scopes: Vec::new(),
        remove_scopes: Vec::new(),
        consumed: whole.end(),
    };
    parse_tail(rest, &mut group);
    Some(group)
}

/// Consume `.scope`, `.if(...)`, `+scope`, `-scope` segments after a group.
fn parse_tail(rest: &str, group: &mut TagGroup) {
    let mut cursor = group.consumed;
    loop {
        let tail = &rest[cursor..];
        if let Some(caps) = tail_if_re().and_then(|re| re.captures(tail)) {
            if group.condition.is_none() {
                group.condition = caps.name("cond").map(|m| m.as_str().to_string());
            }
            cursor += caps.get(0).map(|m| m.end()).unwrap_or(0);
            continue;
        }
        if group.scope.is_none() && group.line_count.is_none() {
            if let Some(caps) = tail_scope_re().and_then(|re| re.captures(tail)) {
                if let Some(name) = caps.name("name") {
                    match name.as_str().parse::<usize>() {
                        Ok(count) if count > 0 => group.line_count = Some(count),
                        Ok(_) => {}
                        Err(_) => group.scope = Some(normalize_scope(name.as_str())),
                    }
                    cursor += caps.get(0).map(|m| m.end()).unwrap_or(0);
                    continue;
                }
            }
        }
        if let Some(caps) = tail_add_re().and_then(|re| re.captures(tail)) {
            if let Some(name) = caps.name("name") {
                group.add_scopes.push(normalize_scope(name.as_str()));
            }
            cursor += caps.get(0).map(|m| m.end()).unwrap_or(0);
            continue;
        }
        if let Some(caps) = tail_remove_re().and_then(|re| re.captures(tail)) {
            if let Some(name) = caps.name("name") {
                group.remove_scopes.push(normalize_scope(name.as_str()));
            }
            cursor += caps.get(0).map(|m| m.end()).unwrap_or(0);
            continue;
        }
        break;
    }
    group.consumed = cursor;
}

fn parse_targets(raw: &str) -> Vec<Target> {
    let mut targets = Vec::new();
    for part in raw.split(',') {
        match part.trim().to_ascii_lowercase().as_str() {
            "ai" => targets.push(Target::Ai),
            "human" | "hu" => targets.push(Target::Human),
            "all" => targets.extend(Target::ALL),
            _ => {}
        }
    }
    targets
}

fn parse_permission(perm: &str, ctx: Option<String>) -> Option<GroupPermission> {
    match perm {
        "r" | "read" | "readonly" | "read-only" => Some(GroupPermission::Explicit(Permission::Read)),
        "w" | "write" => Some(GroupPermission::Explicit(Permission::Write)),
        "n" | "noaccess" | "none" => Some(GroupPermission::Explicit(Permission::NoAccess)),
        "context" => {
            let writable = matches!(ctx.as_deref(), Some("w") | Some("write"));
            Some(GroupPermission::Context { writable })
        }
        _ => None,
    }
}

fn apply_group(tag: &mut GuardTag, group: &TagGroup) {
    for &target in &group.targets {
        match group.permission {
            GroupPermission::Explicit(p) => {
                tag.set_permission(target, Some(p));
                tag.set_context(target, false);
            }
            GroupPermission::Context { writable } => {
                let value = writable.then_some(Permission::ContextWrite);
                tag.set_permission(target, value);
                tag.set_context(target, true);
            }
        }
    }
    if group.identifier.is_some() {
        tag.identifier = group.identifier.clone();
    }
    if group.metadata.is_some() {
        tag.metadata = group.metadata.clone();
    }
    if group.condition.is_some() {
        tag.condition = group.condition.clone();
    }
    if let Some(count) = group.line_count {
        tag.line_count = Some(count);
        tag.scope = None;
    } else if let Some(scope) = &group.scope {
        tag.scope = Some(scope.clone());
        tag.line_count = None;
    }
    tag.add_scopes.extend(group.add_scopes.iter().cloned());
    tag.remove_scopes.extend(group.remove_scopes.iter().cloned());
}
