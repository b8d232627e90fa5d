//! Theme command handlers.

use super::{CommandResult, GuardWorker, VERSION, parse_payload};
use guard_worker_protocol::{
    CreateThemePayload, INVALID_EXPORT_DATA, INVALID_THEME_DATA, ImportThemePayload,
    ThemeIdPayload, UpdateThemePayload,
};
use serde_json::{Value, json};

impl GuardWorker {
    /// Handle `getThemes`: built-in and custom themes, partitioned.
    pub(crate) fn handle_get_themes(&self) -> CommandResult {
        let (builtin, custom) = self.themes.list();
        Ok(json!({
            "builtIn": themes_object(builtin),
            "custom": themes_object(custom),
        }))
    }

    /// Handle `createTheme`.
    pub(crate) fn handle_create_theme(&mut self, payload: Option<Value>) -> CommandResult {
        let p: CreateThemePayload = parse_payload(payload, INVALID_THEME_DATA)?;
        let theme_id = self.themes.create(&p.name, &p.colors)?;
        Ok(json!({
            "themeId": theme_id,
            "message": format!("theme '{}' created", p.name),
        }))
    }

    /// Handle `updateTheme`.
    pub(crate) fn handle_update_theme(&mut self, payload: Option<Value>) -> CommandResult {
        let p: UpdateThemePayload = parse_payload(payload, INVALID_THEME_DATA)?;
        self.themes.update(&p.theme_id, p.name.as_deref(), &p.colors)?;
        Ok(json!({ "message": format!("theme '{}' updated", p.theme_id) }))
    }

    /// Handle `deleteTheme`.
    pub(crate) fn handle_delete_theme(&mut self, payload: Option<Value>) -> CommandResult {
        let p: ThemeIdPayload = parse_payload(payload, INVALID_THEME_DATA)?;
        self.themes.delete(&p.theme_id)?;
        Ok(json!({ "message": format!("theme '{}' deleted", p.theme_id) }))
    }

    /// Handle `exportTheme`.
    pub(crate) fn handle_export_theme(&self, payload: Option<Value>) -> CommandResult {
        let p: ThemeIdPayload = parse_payload(payload, INVALID_THEME_DATA)?;
        let (name, export_data) = self.themes.export(&p.theme_id, VERSION)?;
        Ok(json!({ "name": name, "exportData": export_data }))
    }

    /// Handle `importTheme`.
    pub(crate) fn handle_import_theme(&mut self, payload: Option<Value>) -> CommandResult {
        let p: ImportThemePayload = parse_payload(payload, INVALID_EXPORT_DATA)?;
        let theme_id = self.themes.import(&p.export_data)?;
        Ok(json!({
            "themeId": theme_id,
            "message": format!("theme '{}' imported", theme_id),
        }))
    }

    /// Handle `getCurrentTheme`.
    pub(crate) fn handle_get_current_theme(&self) -> CommandResult {
        let (selected, is_builtin, colors) = self.themes.current();
        Ok(json!({
            "selectedTheme": selected,
            "isBuiltIn": is_builtin,
            "colors": colors,
        }))
    }

    /// Handle `setCurrentTheme`.
    pub(crate) fn handle_set_current_theme(&mut self, payload: Option<Value>) -> CommandResult {
        let p: ThemeIdPayload = parse_payload(payload, INVALID_THEME_DATA)?;
        let colors = self.themes.set_current(&p.theme_id)?;
        Ok(json!({
            "message": format!("theme '{}' selected", p.theme_id),
            "colors": colors,
        }))
    }
}

fn themes_object(themes: &std::collections::BTreeMap<String, guard_theme::Theme>) -> Value {
    let mut map = serde_json::Map::new();
    for (id, theme) in themes {
        map.insert(
            id.clone(),
            json!({ "name": theme.name, "colors": theme.colors }),
        );
    }
    Value::Object(map)
}
