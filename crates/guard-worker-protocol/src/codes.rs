//! Stable error codes carried on error responses.

/// A frame did not parse as JSON or as a request envelope.
pub const INVALID_JSON: &str = "INVALID_JSON";
/// The command name is not part of the protocol.
pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
/// `applyDelta` arrived before any `setDocument`.
pub const NO_DOCUMENT: &str = "NO_DOCUMENT";
/// Version mismatch, out-of-range coordinates, or a malformed change list.
pub const INVALID_DELTA: &str = "INVALID_DELTA";
/// Guard parsing threw an unrecoverable error.
pub const PARSE_ERROR: &str = "PARSE_ERROR";
/// The compatibility floor requested by the client is not satisfied.
pub const VERSION_MISMATCH: &str = "VERSION_MISMATCH";
/// No theme is stored under the given id.
pub const THEME_NOT_FOUND: &str = "THEME_NOT_FOUND";
/// A theme with the same normalized name already exists.
pub const THEME_ALREADY_EXISTS: &str = "THEME_ALREADY_EXISTS";
/// Theme body failed validation.
pub const INVALID_THEME_DATA: &str = "INVALID_THEME_DATA";
/// Built-in themes cannot be modified or deleted.
pub const BUILTIN_THEME_READONLY: &str = "BUILTIN_THEME_READONLY";
/// Import payload is not a valid theme export.
pub const INVALID_EXPORT_DATA: &str = "INVALID_EXPORT_DATA";
