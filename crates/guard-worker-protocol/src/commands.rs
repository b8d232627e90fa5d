//! Typed payload and result shapes for every command.

use guard_document::DeltaChange;
use guard_tag::{GuardTag, LinePermission};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authoritative command set, in dispatch order.
pub const COMMANDS: &[&str] = &[
    "version",
    "ping",
    "setDocument",
    "applyDelta",
    "getThemes",
    "createTheme",
    "updateTheme",
    "deleteTheme",
    "exportTheme",
    "importTheme",
    "getCurrentTheme",
    "setCurrentTheme",
    "shutdown",
];

/// Payload of `setDocument`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDocumentPayload {
    /// Client-side file name, informational.
    pub file_name: String,
    /// Host language identifier.
    pub language_id: String,
    /// Full document text.
    pub content: String,
    /// Authoritative document version.
    pub version: i64,
}

/// Payload of `applyDelta`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyDeltaPayload {
    /// Declared new version, must be current + 1.
    pub version: i64,
    /// Ranged edits, applied in order.
    pub changes: Vec<DeltaChange>,
}

/// Result of `setDocument` and `applyDelta`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    /// Recognized guard tags with resolved ranges, in line order.
    pub guard_tags: Vec<GuardTag>,
    /// One entry per document line, 1-based.
    pub line_permissions: Vec<LinePermission>,
    /// Version after the operation.
    pub document_version: i64,
}

/// Result of `version`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResult {
    /// Worker version.
    pub version: String,
    /// Oldest client version this worker supports.
    pub min_compatible: String,
    /// Whether the client-requested floor is satisfied.
    pub compatible: bool,
}

/// Result of `ping`.
#[derive(Debug, Clone, Serialize)]
pub struct PingResult {
    /// Always true.
    pub pong: bool,
    /// Milliseconds since worker startup.
    pub uptime: u64,
}

/// Payload of `createTheme`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThemePayload {
    /// Display name of the new theme.
    pub name: String,
    /// Color table, validated by the theme store.
    pub colors: Value,
}

/// Payload of `updateTheme`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateThemePayload {
    /// Id of the custom theme to update.
    pub theme_id: String,
    /// New display name, unchanged when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement color table.
    pub colors: Value,
}

/// Payload of the commands addressing one theme by id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeIdPayload {
    /// Theme id.
    pub theme_id: String,
}

/// Payload of `importTheme`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportThemePayload {
    /// A structure previously produced by `exportTheme`.
    pub export_data: Value,
}
