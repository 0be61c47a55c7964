use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use ventoy_assist::document::{
    document_path, persist_document, MenuAlias, MenuClass, VentoyConfig,
};
use ventoy_assist::error::Error;

fn write_document(volume: &Path, content: &str) -> PathBuf {
    let path = document_path(volume);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}

fn keys(value: &Value) -> Vec<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

#[test]
fn parses_recognized_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        dir.path(),
        r#"{
    "theme": { "file": "/ventoy/themes/Tela/theme.txt", "gfxmode": "1920x1080" },
    "theme_uefi": { "file": ["/a/theme.txt", "/b/theme.txt"] },
    "menu_class": [
        { "key": "ubuntu", "class": "ubuntu" },
        { "dir": "/ISOs/win", "class": "windows" },
        { "parent": "/ISOs/linux", "class": "linux" },
        { "class": "orphan" }
    ],
    "menu_alias": [
        { "image": "/ISOs/debian.iso", "alias": "Debian" },
        { "dir": "/ISOs", "alias": "Images" }
    ],
    "control": [{ "VTOY_DEFAULT_MENU_MODE": "0" }]
}"#,
    );

    let config = VentoyConfig::load(&path).unwrap();
    assert_eq!(config.themes.len(), 2);
    assert_eq!(config.themes[0].key, "theme");
    assert_eq!(config.themes[0].files(), vec!["/ventoy/themes/Tela/theme.txt"]);
    assert_eq!(config.themes[1].files(), vec!["/a/theme.txt", "/b/theme.txt"]);

    let classes = config.menu_class_entries();
    assert_eq!(classes.len(), 4);
    assert!(matches!(&classes[0], MenuClass::Key { key, .. } if key == "ubuntu"));
    assert!(matches!(&classes[1], MenuClass::Dir { dir, .. } if dir == "/ISOs/win"));
    assert!(matches!(&classes[2], MenuClass::Parent { parent, .. } if parent == "/ISOs/linux"));
    assert!(matches!(&classes[3], MenuClass::Other(_)));

    assert_eq!(
        config.menu_alias_entries(),
        &[
            MenuAlias::image("/ISOs/debian.iso", "Debian"),
            MenuAlias::dir("/ISOs", "Images"),
        ]
    );
    assert!(config.extra.contains_key("control"));
}

#[test]
fn round_trip_preserves_unknown_keys_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let original = json!({
        "control": [{ "VTOY_DEFAULT_SEARCH_ROOT": "/ISOs" }],
        "theme": { "file": "/ventoy/themes/Tela/theme.txt", "display_mode": "GUI" },
        "menu_class": [{ "key": "kali", "class": "kali" }],
        "persistence": [{ "image": "/ISOs/ubuntu.iso", "backend": "/persistence.dat" }],
        "theme_legacy": "not an object"
    });
    let path = write_document(dir.path(), &original.to_string());

    let config = VentoyConfig::load(&path).unwrap();
    config.save(&path).unwrap();

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, original);
    assert_eq!(
        keys(&saved),
        vec!["control", "theme", "menu_class", "persistence", "theme_legacy"]
    );
}

#[test]
fn new_sections_are_appended() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), r#"{ "control": [] }"#);

    let mut config = VentoyConfig::load(&path).unwrap();
    config.menu_alias = Some(vec![MenuAlias::image("/a.iso", "A")]);
    config.save(&path).unwrap();

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(keys(&saved), vec!["control", "menu_alias"]);
    assert_eq!(saved["menu_alias"], json!([{ "image": "/a.iso", "alias": "A" }]));
}

#[test]
fn saves_with_four_space_indent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), r#"{"menu_class":[{"key":"a","class":"b"}]}"#);

    let config = VentoyConfig::load(&path).unwrap();
    config.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("{\n    \"menu_class\": [\n        {"), "{content}");
}

#[test]
fn blank_file_is_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), "  \n");

    let config = VentoyConfig::load(&path).unwrap();
    assert_eq!(config, VentoyConfig::default());
}

#[test]
fn missing_document_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = VentoyConfig::load(&document_path(dir.path())).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn invalid_json_is_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), r#"{ "theme": { "file": "x" }, }"#);

    assert!(matches!(
        VentoyConfig::load(&path),
        Err(Error::Syntax { .. })
    ));
}

#[test]
fn non_array_menu_class_is_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), r#"{ "menu_class": { "key": "x" } }"#);

    assert!(matches!(
        VentoyConfig::load(&path),
        Err(Error::Syntax { .. })
    ));
}

#[test]
fn non_object_document_is_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), "[1, 2, 3]");

    assert!(matches!(
        VentoyConfig::load(&path),
        Err(Error::Syntax { .. })
    ));
}

#[test]
fn failed_validation_leaves_original_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let original = "{\n    \"control\": []\n}";
    let path = write_document(dir.path(), original);

    let err = persist_document(&path, "{ \"control\": [ ").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec!["ventoy.json"]);
}

#[test]
fn persist_replaces_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(dir.path(), "{}");

    persist_document(&path, r#"{ "control": [] }"#).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{ "control": [] }"#
    );
}

#[test]
fn entry_fields_survive_a_save() {
    let dir = tempfile::tempdir().unwrap();
    let original = json!({
        "menu_class": [
            { "key": "ubuntu", "class": "ubuntu", "comment": "keep me" },
            { "key": "kali", "dir": "/ISOs/kali", "class": "kali" }
        ],
        "menu_alias": [
            { "image": "/ISOs/old.iso", "alias": "Old", "note": "keep me too" }
        ]
    });
    let path = write_document(dir.path(), &original.to_string());

    let config = VentoyConfig::load(&path).unwrap();
    assert!(matches!(
        &config.menu_class_entries()[1],
        MenuClass::Key { key, extra, .. } if key == "kali" && extra["dir"] == "/ISOs/kali"
    ));
    config.save(&path).unwrap();

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, original);
}
