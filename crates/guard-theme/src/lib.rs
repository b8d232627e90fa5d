//! Theme storage for the guard worker.
//!
//! Built-in themes are compiled in from a JSON resource and never change.
//! Custom themes and the current selection live in two JSON files under the
//! per-user configuration directory, rewritten atomically (temp file +
//! rename) on every mutation. The store validates theme bodies but does not
//! interpret them; color mixing and rendering belong to the editor side.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod validate;

pub use validate::{normalize_theme_id, validate_colors, validate_name};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Theme subsystem errors, each with a stable wire code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    /// No theme stored under the id.
    #[error("theme '{0}' not found")]
    NotFound(String),
    /// A theme with the same normalized name exists.
    #[error("theme '{0}' already exists")]
    AlreadyExists(String),
    /// Validation failure in a theme body.
    #[error("invalid theme data: {0}")]
    InvalidData(String),
    /// Built-in themes are read-only.
    #[error("built-in themes cannot be modified")]
    BuiltinReadonly,
    /// An import payload is not a valid export.
    #[error("invalid export data: {0}")]
    InvalidExport(String),
}

impl ThemeError {
    /// Stable wire code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ThemeError::NotFound(_) => "THEME_NOT_FOUND",
            ThemeError::AlreadyExists(_) => "THEME_ALREADY_EXISTS",
            ThemeError::InvalidData(_) => "INVALID_THEME_DATA",
            ThemeError::BuiltinReadonly => "BUILTIN_THEME_READONLY",
            ThemeError::InvalidExport(_) => "INVALID_EXPORT_DATA",
        }
    }
}

/// One stored theme: a display name plus an opaque validated color table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Display name, stored verbatim.
    pub name: String,
    /// Color table keyed by the eight permission keys.
    pub colors: Value,
}

const BUILTIN_THEMES: &str = include_str!("../resources/builtin-themes.json");
const DEFAULT_THEME_ID: &str = "default";
const APP_DIR: &str = "guard-worker";

/// Per-user configuration directory for the worker's persisted state.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Built-in plus custom themes and the current selection.
pub struct ThemeStore {
    builtin: BTreeMap<String, Theme>,
    custom: BTreeMap<String, Theme>,
    current: String,
    custom_path: Option<PathBuf>,
    current_path: Option<PathBuf>,
}

impl ThemeStore {
    /// Store rooted at the per-user configuration directory.
    ///
    /// Missing or unreadable state files simply yield an empty custom map
    /// and the default selection; the worker must come up regardless.
    pub fn new() -> Self {
        let dir = config_dir();
        Self::with_paths(
            dir.as_ref().map(|d| d.join("custom-themes.json")),
            dir.as_ref().map(|d| d.join("current-theme.json")),
        )
    }

    /// Store with explicit state file locations (tests use a temp dir).
    pub fn with_paths(custom_path: Option<PathBuf>, current_path: Option<PathBuf>) -> Self {
        let builtin: BTreeMap<String, Theme> =
            serde_json::from_str(BUILTIN_THEMES).unwrap_or_default();
        let custom = custom_path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        let current = current_path
            .as_deref()
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .and_then(|v| v.get("selectedTheme").and_then(|s| s.as_str()).map(String::from))
            .unwrap_or_else(|| DEFAULT_THEME_ID.to_string());
        let mut store = ThemeStore { builtin, custom, current, custom_path, current_path };
        if store.lookup(&store.current.clone()).is_none() {
            store.current = DEFAULT_THEME_ID.to_string();
        }
        store
    }

    fn lookup(&self, id: &str) -> Option<&Theme> {
        self.builtin.get(id).or_else(|| self.custom.get(id))
    }

    /// Built-in and custom themes, partitioned.
    pub fn list(&self) -> (&BTreeMap<String, Theme>, &BTreeMap<String, Theme>) {
        (&self.builtin, &self.custom)
    }

    /// Create a custom theme; returns the normalized id.
    pub fn create(&mut self, name: &str, colors: &Value) -> Result<String, ThemeError> {
        validate_name(name)?;
        validate_colors(colors)?;
        let id = normalize_theme_id(name);
        if id.is_empty() {
            return Err(ThemeError::InvalidData("name normalizes to an empty id".to_string()));
        }
        if self.builtin.contains_key(&id) || self.custom.contains_key(&id) {
            return Err(ThemeError::AlreadyExists(name.to_string()));
        }
        self.custom.insert(id.clone(), Theme { name: name.to_string(), colors: colors.clone() });
        self.persist_custom();
        Ok(id)
    }

    /// Update a custom theme in place; built-ins are read-only.
    pub fn update(
        &mut self,
        theme_id: &str,
        name: Option<&str>,
        colors: &Value,
    ) -> Result<(), ThemeError> {
        if self.builtin.contains_key(theme_id) {
            return Err(ThemeError::BuiltinReadonly);
        }
        if !self.custom.contains_key(theme_id) {
            return Err(ThemeError::NotFound(theme_id.to_string()));
        }
        if let Some(name) = name {
            validate_name(name)?;
        }
        validate_colors(colors)?;
        if let Some(theme) = self.custom.get_mut(theme_id) {
            if let Some(name) = name {
                theme.name = name.to_string();
            }
            theme.colors = colors.clone();
        }
        self.persist_custom();
        Ok(())
    }

    /// Delete a custom theme; selecting it again falls back to the default.
    pub fn delete(&mut self, theme_id: &str) -> Result<(), ThemeError> {
        if self.builtin.contains_key(theme_id) {
            return Err(ThemeError::BuiltinReadonly);
        }
        if self.custom.remove(theme_id).is_none() {
            return Err(ThemeError::NotFound(theme_id.to_string()));
        }
        if self.current == theme_id {
            self.current = DEFAULT_THEME_ID.to_string();
            self.persist_current();
        }
        self.persist_custom();
        Ok(())
    }

    /// Export a theme: its stored structure plus a timestamp and version.
    pub fn export(&self, theme_id: &str, version: &str) -> Result<(String, Value), ThemeError> {
        let theme = self.lookup(theme_id).ok_or_else(|| ThemeError::NotFound(theme_id.into()))?;
        let export = json!({
            "name": theme.name,
            "colors": theme.colors,
            "exportedAt": chrono::Utc::now().to_rfc3339(),
            "version": version,
        });
        Ok((theme.name.clone(), export))
    }

    /// Create a custom theme from an export structure.
    pub fn import(&mut self, export_data: &Value) -> Result<String, ThemeError> {
        let name = export_data
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| ThemeError::InvalidExport("missing name".to_string()))?;
        let colors = export_data
            .get("colors")
            .ok_or_else(|| ThemeError::InvalidExport("missing colors".to_string()))?;
        validate_name(name).map_err(|e| ThemeError::InvalidExport(e.to_string()))?;
        validate_colors(colors).map_err(|e| ThemeError::InvalidExport(e.to_string()))?;
        self.create(name, colors).map_err(|e| match e {
            ThemeError::AlreadyExists(n) => ThemeError::AlreadyExists(n),
            other => ThemeError::InvalidExport(other.to_string()),
        })
    }

    /// Currently selected theme: id, whether built-in, and its colors.
    pub fn current(&self) -> (String, bool, Value) {
        match self.lookup(&self.current) {
            Some(theme) => {
                (self.current.clone(), self.builtin.contains_key(&self.current), theme.colors.clone())
            }
            None => (self.current.clone(), false, Value::Null),
        }
    }

    /// Select a theme by id.
    pub fn set_current(&mut self, theme_id: &str) -> Result<Value, ThemeError> {
        let theme =
            self.lookup(theme_id).ok_or_else(|| ThemeError::NotFound(theme_id.to_string()))?;
        let colors = theme.colors.clone();
        self.current = theme_id.to_string();
        self.persist_current();
        Ok(colors)
    }

    /// Best-effort atomic persistence of the custom theme map.
    fn persist_custom(&self) {
        if let Some(path) = &self.custom_path {
            if let Ok(body) = serde_json::to_string_pretty(&self.custom) {
                if let Err(e) = write_atomic(path, &body) {
                    eprintln!("guard-worker: failed to persist custom themes: {}", e);
                }
            }
        }
    }

    fn persist_current(&self) {
        if let Some(path) = &self.current_path {
            let body = json!({ "selectedTheme": self.current }).to_string();
            if let Err(e) = write_atomic(path, &body) {
                eprintln!("guard-worker: failed to persist theme selection: {}", e);
            }
        }
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        ThemeStore::new()
    }
}

/// Write a file via a temp sibling and rename so a crash never leaves a
/// partially written file behind.
fn write_atomic(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)
}
