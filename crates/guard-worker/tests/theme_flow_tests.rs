//! Theme commands end to end.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod support;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use support::WorkerHarness;

fn entry() -> Value {
    json!({ "enabled": true, "color": "#336699", "transparency": 0.2 })
}

fn colors() -> Value {
    json!({
        "aiWrite": entry(), "aiRead": entry(), "aiNoAccess": entry(),
        "humanWrite": entry(), "humanRead": entry(), "humanNoAccess": entry(),
        "contextRead": entry(), "contextWrite": entry()
    })
}

#[test]
fn get_themes_partitions_builtin_and_custom() {
    let mut harness = WorkerHarness::new();
    let result = harness.expect_success("getThemes", None);
    assert!(result["builtIn"]["default"].is_object());
    assert_eq!(result["custom"], json!({}));
}

#[test]
fn create_then_list_custom_theme() {
    let mut harness = WorkerHarness::new();
    let created = harness.expect_success(
        "createTheme",
        Some(json!({"name": "Ocean Blue", "colors": colors()})),
    );
    assert_eq!(created["themeId"], "oceanblue");

    let themes = harness.expect_success("getThemes", None);
    assert_eq!(themes["custom"]["oceanblue"]["name"], "Ocean Blue");
}

#[test]
fn create_duplicate_fails() {
    let mut harness = WorkerHarness::new();
    harness.expect_success("createTheme", Some(json!({"name": "Twice", "colors": colors()})));
    let code =
        harness.expect_error("createTheme", Some(json!({"name": "twice!", "colors": colors()})));
    assert_eq!(code, "THEME_ALREADY_EXISTS");
}

#[test]
fn create_with_bad_colors_fails_validation() {
    let mut harness = WorkerHarness::new();
    let mut bad = colors();
    bad["aiRead"]["transparency"] = json!(7.0);
    let code = harness.expect_error("createTheme", Some(json!({"name": "Bad", "colors": bad})));
    assert_eq!(code, "INVALID_THEME_DATA");
}

#[test]
fn update_builtin_is_readonly() {
    let mut harness = WorkerHarness::new();
    let code = harness.expect_error(
        "updateTheme",
        Some(json!({"themeId": "default", "colors": colors()})),
    );
    assert_eq!(code, "BUILTIN_THEME_READONLY");
}

#[test]
fn update_and_delete_custom_theme() {
    let mut harness = WorkerHarness::new();
    harness.expect_success("createTheme", Some(json!({"name": "Mutable", "colors": colors()})));

    let mut changed = colors();
    changed["aiRead"]["color"] = json!("#ABCDEF");
    harness.expect_success(
        "updateTheme",
        Some(json!({"themeId": "mutable", "name": "Renamed", "colors": changed})),
    );
    let themes = harness.expect_success("getThemes", None);
    assert_eq!(themes["custom"]["mutable"]["name"], "Renamed");
    assert_eq!(themes["custom"]["mutable"]["colors"]["aiRead"]["color"], "#ABCDEF");

    harness.expect_success("deleteTheme", Some(json!({"themeId": "mutable"})));
    let themes = harness.expect_success("getThemes", None);
    assert_eq!(themes["custom"], json!({}));
}

#[test]
fn delete_unknown_theme_not_found() {
    let mut harness = WorkerHarness::new();
    let code = harness.expect_error("deleteTheme", Some(json!({"themeId": "ghost"})));
    assert_eq!(code, "THEME_NOT_FOUND");
}

#[test]
fn export_import_round_trip() {
    let mut harness = WorkerHarness::new();
    harness.expect_success("createTheme", Some(json!({"name": "Traveler", "colors": colors()})));

    let exported = harness.expect_success("exportTheme", Some(json!({"themeId": "traveler"})));
    assert_eq!(exported["name"], "Traveler");
    assert_eq!(exported["exportData"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(exported["exportData"]["exportedAt"].is_string());

    harness.expect_success("deleteTheme", Some(json!({"themeId": "traveler"})));
    let imported = harness.expect_success(
        "importTheme",
        Some(json!({"exportData": exported["exportData"]})),
    );
    assert_eq!(imported["themeId"], "traveler");

    let themes = harness.expect_success("getThemes", None);
    assert_eq!(themes["custom"]["traveler"]["colors"], colors());
}

#[test]
fn import_garbage_is_invalid_export() {
    let mut harness = WorkerHarness::new();
    let code =
        harness.expect_error("importTheme", Some(json!({"exportData": {"whatever": 1}})));
    assert_eq!(code, "INVALID_EXPORT_DATA");
}

#[test]
fn current_theme_defaults_to_builtin() {
    let mut harness = WorkerHarness::new();
    let current = harness.expect_success("getCurrentTheme", None);
    assert_eq!(current["selectedTheme"], "default");
    assert_eq!(current["isBuiltIn"], true);
    assert!(current["colors"].is_object());
}

#[test]
fn set_current_theme_round_trip() {
    let mut harness = WorkerHarness::new();
    harness.expect_success("createTheme", Some(json!({"name": "Chosen", "colors": colors()})));
    let set = harness.expect_success("setCurrentTheme", Some(json!({"themeId": "chosen"})));
    assert_eq!(set["colors"], colors());

    let current = harness.expect_success("getCurrentTheme", None);
    assert_eq!(current["selectedTheme"], "chosen");
    assert_eq!(current["isBuiltIn"], false);
}

#[test]
fn set_current_unknown_theme_fails() {
    let mut harness = WorkerHarness::new();
    let code = harness.expect_error("setCurrentTheme", Some(json!({"themeId": "nope"})));
    assert_eq!(code, "THEME_NOT_FOUND");
}
