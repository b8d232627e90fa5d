//! Theme body validation.

use crate::ThemeError;
use serde_json::Value;

const REQUIRED_KEYS: &[&str] = &[
    "aiWrite",
    "aiRead",
    "aiNoAccess",
    "humanWrite",
    "humanRead",
    "humanNoAccess",
    "contextRead",
    "contextWrite",
];

const MIX_PATTERNS: &[&str] = &["aiBorder", "aiPriority", "average", "humanBorder", "humanPriority"];

const MAX_NAME_LEN: usize = 100;

/// Validate a display name: non-empty and bounded length.
pub fn validate_name(name: &str) -> Result<(), ThemeError> {
    if name.trim().is_empty() {
        return Err(ThemeError::InvalidData("theme name is empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ThemeError::InvalidData(format!(
            "theme name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Normalize a display name to its storage id: lowercase alphanumerics only.
pub fn normalize_theme_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Validate a color table against the wire contract.
///
/// All eight permission keys must be present; each entry needs a boolean
/// `enabled`, a `#RRGGBB` or `#RGB` color, and a `transparency` in [0, 1].
/// `borderOpacity` and `highlightEntireLine` are optional with the same
/// constraints; `mixPattern` must name a known mixing strategy.
pub fn validate_colors(colors: &Value) -> Result<(), ThemeError> {
    let invalid = |reason: String| ThemeError::InvalidData(reason);
    let obj = colors
        .as_object()
        .ok_or_else(|| invalid("colors must be an object".to_string()))?;

    for key in REQUIRED_KEYS {
        let entry = obj.get(*key).ok_or_else(|| invalid(format!("missing color key '{}'", key)))?;
        validate_entry(key, entry)?;
    }

    if let Some(pattern) = obj.get("mixPattern") {
        let name = pattern
            .as_str()
            .ok_or_else(|| invalid("mixPattern must be a string".to_string()))?;
        if !MIX_PATTERNS.contains(&name) {
            return Err(invalid(format!("unknown mixPattern '{}'", name)));
        }
    }
    Ok(())
}

fn validate_entry(key: &str, entry: &Value) -> Result<(), ThemeError> {
    let invalid = |reason: String| ThemeError::InvalidData(reason);
    let obj =
        entry.as_object().ok_or_else(|| invalid(format!("'{}' must be an object", key)))?;

    if !obj.get("enabled").map(Value::is_boolean).unwrap_or(false) {
        return Err(invalid(format!("'{}' needs a boolean 'enabled'", key)));
    }
    let color = obj
        .get("color")
        .and_then(|c| c.as_str())
        .ok_or_else(|| invalid(format!("'{}' needs a 'color' string", key)))?;
    if !is_hex_color(color) {
        return Err(invalid(format!("'{}' color '{}' is not #RRGGBB or #RGB", key, color)));
    }
    check_unit_interval(obj.get("transparency"), true, key, "transparency")?;
    check_unit_interval(obj.get("borderOpacity"), false, key, "borderOpacity")?;
    if let Some(flag) = obj.get("highlightEntireLine") {
        if !flag.is_boolean() {
            return Err(invalid(format!("'{}' highlightEntireLine must be a boolean", key)));
        }
    }
    Ok(())
}

fn check_unit_interval(
    value: Option<&Value>,
    required: bool,
    key: &str,
    field: &str,
) -> Result<(), ThemeError> {
    match value {
        Some(v) => {
            let n = v.as_f64().ok_or_else(|| {
                ThemeError::InvalidData(format!("'{}' {} must be a number", key, field))
            })?;
            if !(0.0..=1.0).contains(&n) {
                return Err(ThemeError::InvalidData(format!(
                    "'{}' {} must lie in [0.0, 1.0]",
                    key, field
                )));
            }
            Ok(())
        }
        None if required => {
            Err(ThemeError::InvalidData(format!("'{}' needs a '{}'", key, field)))
        }
        None => Ok(()),
    }
}

fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 6 || digits.len() == 3) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
