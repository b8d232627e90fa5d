//! Guard tag data model and single-line recognizer.
//!
//! A guard tag is an annotation of the form `@guard:ai:r.10` embedded in a
//! host-language comment. It names one or more targets (`ai`, `human`, `all`),
//! a permission, and an optional scope (a line count or a semantic construct).
//! This crate recognizes and normalizes a single occurrence; scope resolution
//! and stack evaluation live in higher-level crates.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod recognize;

pub use recognize::recognize_line;

use serde::{Deserialize, Serialize};

/// Agent class a guard applies to.
///
/// `all` in the surface syntax expands to both targets during recognition
/// and never appears in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Machine assistant.
    Ai,
    /// Human developer.
    Human,
}

impl Target {
    /// Both targets, in wire order.
    pub const ALL: [Target; 2] = [Target::Ai, Target::Human];
}

/// Normalized permission value.
///
/// Surface aliases (`read`, `readonly`, `read-only`, `write`, `noaccess`,
/// `none`) collapse onto the short forms. `ContextWrite` is the promoted
/// form of `context:w` and only ever appears together with a context flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Read-only access.
    #[serde(rename = "r")]
    Read,
    /// Read-write access.
    #[serde(rename = "w")]
    Write,
    /// No access.
    #[serde(rename = "n")]
    NoAccess,
    /// Writable context region.
    #[serde(rename = "contextWrite")]
    ContextWrite,
}

impl Permission {
    /// Collapse to the three-valued form used in per-line permission maps.
    ///
    /// Consumers that do not understand `contextWrite` must treat it as `w`.
    pub fn effective(self) -> Permission {
        match self {
            Permission::ContextWrite => Permission::Write,
            other => other,
        }
    }
}

/// A recognized guard tag, one per declaration line.
///
/// Multiple `@guard:` occurrences on the same line merge into a single tag;
/// conflicts on the same target resolve right-most-wins. `scope_start` and
/// `scope_end` are absent until scope resolution attaches a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardTag {
    /// Declaration line, 1-based.
    pub line_number: usize,
    /// Free-form identifier from `[...]` before the permission, lowercased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Normalized semantic scope name, absent for line-count tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Line count scope, mutually exclusive with `scope`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    /// Scope names after `+`, carried through without affecting resolution.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_scopes: Vec<String>,
    /// Scope names after `-`, carried through without affecting resolution.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_scopes: Vec<String>,
    /// Metadata from `[...]` after the permission, carried verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    /// Condition text from `.if(...)`, carried verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Explicit permission for the `ai` target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_permission: Option<Permission>,
    /// Explicit permission for the `human` target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_permission: Option<Permission>,
    /// Whether the tag marks a context region for `ai`.
    pub ai_is_context: bool,
    /// Whether the tag marks a context region for `human`.
    pub human_is_context: bool,
    /// First line covered by the tag, 1-based inclusive, set by resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_start: Option<usize>,
    /// Last line covered by the tag, 1-based inclusive, set by resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_end: Option<usize>,
}

impl GuardTag {
    /// Explicit permission for the given target, if any.
    pub fn permission_for(&self, target: Target) -> Option<Permission> {
        match target {
            Target::Ai => self.ai_permission,
            Target::Human => self.human_permission,
        }
    }

    /// Context flag for the given target.
    pub fn is_context_for(&self, target: Target) -> bool {
        match target {
            Target::Ai => self.ai_is_context,
            Target::Human => self.human_is_context,
        }
    }

    /// Set the explicit permission for a target.
    pub fn set_permission(&mut self, target: Target, permission: Option<Permission>) {
        match target {
            Target::Ai => self.ai_permission = permission,
            Target::Human => self.human_permission = permission,
        }
    }

    /// Set the context flag for a target.
    pub fn set_context(&mut self, target: Target, is_context: bool) {
        match target {
            Target::Ai => self.ai_is_context = is_context,
            Target::Human => self.human_is_context = is_context,
        }
    }

    /// True when the tag carries at least one permission or context flag.
    ///
    /// Tags that fail this check are dropped by the recognizer.
    pub fn has_any_directive(&self) -> bool {
        self.ai_permission.is_some()
            || self.human_permission.is_some()
            || self.ai_is_context
            || self.human_is_context
    }

    /// True when the tag declares a context region for either target.
    pub fn is_context(&self) -> bool {
        self.ai_is_context || self.human_is_context
    }
}

/// Per-target permission values for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionPair {
    /// Effective permission for the machine assistant.
    pub ai: Permission,
    /// Effective permission for the human developer.
    pub human: Permission,
}

/// Per-target context flags for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPair {
    /// Whether the line is context for the machine assistant.
    pub ai: bool,
    /// Whether the line is context for the human developer.
    pub human: bool,
}

/// Resolved access state of a single document line.
///
/// Defined for every line of a document; lines with no active guard carry
/// the defaults `{ai: r, human: w}` with both context flags false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePermission {
    /// Line number, 1-based.
    pub line: usize,
    /// Effective permissions, collapsed to `r`/`w`/`n`.
    pub permissions: PermissionPair,
    /// Context flags.
    pub is_context: ContextPair,
}

impl LinePermission {
    /// The unguarded default for a line.
    pub fn unguarded(line: usize) -> Self {
        LinePermission {
            line,
            permissions: PermissionPair { ai: Permission::Read, human: Permission::Write },
            is_context: ContextPair::default(),
        }
    }
}

/// Normalize a semantic scope name, resolving surface aliases.
pub fn normalize_scope(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    match lower.as_str() {
        "sig" => "signature".to_string(),
        "func" => "function".to_string(),
        "stmt" => "statement".to_string(),
        "doc" => "docstring".to_string(),
        "dec" => "decorator".to_string(),
        "val" => "value".to_string(),
        "expr" => "expression".to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn permission_serializes_to_short_forms() {
        assert_eq!(serde_json::to_value(Permission::Read).ok(), Some(serde_json::json!("r")));
        assert_eq!(serde_json::to_value(Permission::Write).ok(), Some(serde_json::json!("w")));
        assert_eq!(serde_json::to_value(Permission::NoAccess).ok(), Some(serde_json::json!("n")));
        assert_eq!(
            serde_json::to_value(Permission::ContextWrite).ok(),
            Some(serde_json::json!("contextWrite"))
        );
    }

    #[test]
    fn context_write_degrades_to_write() {
        assert_eq!(Permission::ContextWrite.effective(), Permission::Write);
        assert_eq!(Permission::NoAccess.effective(), Permission::NoAccess);
    }

    #[test]
    fn scope_aliases_normalize() {
        assert_eq!(normalize_scope("FUNC"), "function");
        assert_eq!(normalize_scope("sig"), "signature");
        assert_eq!(normalize_scope("stmt"), "statement");
        assert_eq!(normalize_scope("doc"), "docstring");
        assert_eq!(normalize_scope("dec"), "decorator");
        assert_eq!(normalize_scope("val"), "value");
        assert_eq!(normalize_scope("expr"), "expression");
        assert_eq!(normalize_scope("class"), "class");
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let tag = GuardTag {
            line_number: 3,
            ai_permission: Some(Permission::Read),
            scope: Some("block".to_string()),
            ..GuardTag::default()
        };
        let v = serde_json::to_value(&tag).ok();
        let v = v.as_ref().and_then(|v| v.as_object());
        let obj = match v {
            Some(obj) => obj,
            None => panic!("tag serializes to an object"),
        };
        assert_eq!(obj.get("lineNumber"), Some(&serde_json::json!(3)));
        assert_eq!(obj.get("aiPermission"), Some(&serde_json::json!("r")));
        assert!(!obj.contains_key("humanPermission"));
        assert!(!obj.contains_key("lineCount"));
    }
}
