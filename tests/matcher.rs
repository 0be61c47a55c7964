use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use ventoy_assist::error::Warning;
use ventoy_assist::matcher::{alias_targets, discover_images, find_tool_matches, to_slash, ToolMatch};

fn extensions() -> Vec<String> {
    ["iso", "wim", "img", "vhd", "vhdx"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

fn icon_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn tool(matched: &str, class: &str) -> ToolMatch {
    ToolMatch {
        matched: matched.to_string(),
        class: class.to_string(),
    }
}

#[test]
fn discovers_images_recursively() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "ISOs/linux/debian.iso");
    touch(dir.path(), "ISOs/Windows.WIM");
    touch(dir.path(), "tools/memtest.img");
    touch(dir.path(), "vm/disk.vhdx");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "ventoy/ventoy.json");

    let mut warnings = Vec::new();
    let images: Vec<String> = discover_images(dir.path(), &extensions(), &mut warnings)
        .iter()
        .map(|p| to_slash(p.strip_prefix(dir.path()).unwrap()))
        .collect();
    assert_eq!(
        images,
        vec![
            "ISOs/Windows.WIM",
            "ISOs/linux/debian.iso",
            "tools/memtest.img",
            "vm/disk.vhdx",
        ]
    );
    assert!(warnings.is_empty());
}

#[test]
fn alias_targets_include_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "ISOs/linux/debian.iso");
    touch(dir.path(), "win.wim");
    touch(dir.path(), "$RECYCLE.BIN/S-1-5/old.iso");

    assert_eq!(
        alias_targets(dir.path(), &extensions(), &mut Vec::new()),
        vec!["ISOs", "ISOs/linux", "ISOs/linux/debian.iso", "win.wim"]
    );
}

#[test]
fn matches_keep_filename_case() {
    let files = vec![
        PathBuf::from("ISOs/Ubuntu-22.04.iso"),
        PathBuf::from("ISOs/Kali-Linux-2024.iso"),
    ];
    let icons = icon_map(&[("ubuntu", "ubuntu"), ("linux", "linux"), ("kali", "kali")]);

    let matches = find_tool_matches(&files, &icons);
    assert_eq!(
        matches,
        BTreeSet::from([
            tool("Kali", "kali"),
            tool("Linux", "linux"),
            tool("Ubuntu", "ubuntu"),
        ])
    );
}

#[test]
fn matches_use_resolved_key() {
    let files = vec![PathBuf::from("firefox-live.iso")];
    let icons = icon_map(&[("firefox", "firefox-alt")]);

    assert_eq!(
        find_tool_matches(&files, &icons),
        BTreeSet::from([tool("firefox", "firefox-alt")])
    );
}

#[test]
fn only_base_name_is_searched() {
    let files = vec![PathBuf::from("ubuntu/server.iso")];
    let icons = icon_map(&[("ubuntu", "ubuntu")]);

    assert!(find_tool_matches(&files, &icons).is_empty());
}

#[test]
fn identical_matches_collapse() {
    let files = vec![
        PathBuf::from("a/Debian-12.iso"),
        PathBuf::from("b/Debian-11.iso"),
        PathBuf::from("c/debian-testing.iso"),
    ];
    let icons = icon_map(&[("debian", "debian")]);

    assert_eq!(
        find_tool_matches(&files, &icons),
        BTreeSet::from([tool("Debian", "debian"), tool("debian", "debian")])
    );
}

#[test]
fn first_occurrence_wins_within_a_name() {
    let files = vec![PathBuf::from("ARCH-arch.iso")];
    let icons = icon_map(&[("arch", "arch")]);

    assert_eq!(
        find_tool_matches(&files, &icons),
        BTreeSet::from([tool("ARCH", "arch")])
    );
}

#[test]
fn unreadable_root_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("unplugged");

    let mut warnings = Vec::new();
    assert!(discover_images(&missing, &extensions(), &mut warnings).is_empty());
    assert!(matches!(
        &warnings[..],
        [Warning::UnreadableEntry { path, .. }] if *path == missing
    ));
}
