//! Scanning the volume for bootable images and matching icon keys against them.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Warning;
use crate::reconcile::IconMap;

const RECYCLE_BIN: &str = "$RECYCLE.BIN";

/// A filename fragment that selects an icon class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToolMatch {
    /// The slice of the filename that matched, with its original case
    pub matched: String,
    pub class: String,
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension().is_some_and(|ext| {
        extensions
            .iter()
            .any(|wanted| ext.eq_ignore_ascii_case(wanted.as_str()))
    })
}

/// Every file under `root` with one of `extensions`, sorted. Entries that
/// cannot be read are skipped and reported in `warnings`.
pub fn discover_images(
    root: &Path,
    extensions: &[String],
    warnings: &mut Vec<Warning>,
) -> Vec<PathBuf> {
    let mut images = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                warnings.push(Warning::UnreadableEntry {
                    path: e.path().unwrap_or(root).to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    debug!(count = images.len(), "discovered images");
    images
}

/// Candidate alias pointers: each image and each directory above it, up to
/// but excluding `root`, as sorted forward-slash relative paths.
pub fn alias_targets(
    root: &Path,
    extensions: &[String],
    warnings: &mut Vec<Warning>,
) -> Vec<String> {
    let mut targets = BTreeSet::new();
    for image in discover_images(root, extensions, warnings) {
        let Ok(relative) = image.strip_prefix(root) else {
            continue;
        };
        if relative
            .components()
            .any(|c| c.as_os_str() == RECYCLE_BIN)
        {
            continue;
        }
        let mut current = Some(relative);
        while let Some(path) = current.filter(|p| !p.as_os_str().is_empty()) {
            targets.insert(to_slash(path));
            current = path.parent();
        }
    }
    targets.into_iter().collect()
}

/// Joins path components with `/` regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Finds the first case-insensitive occurrence of `needle` in `haystack` and
/// returns the matching slice of `haystack` as written.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<String> {
    let hay: Vec<char> = haystack.chars().collect();
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    let eq = |a: char, b: char| a == b || a.to_lowercase().eq(b.to_lowercase());
    hay.windows(needle.len())
        .find(|window| window.iter().zip(&needle).all(|(&a, &b)| eq(a, b)))
        .map(|window| window.iter().collect())
}

/// Matches every icon key against every file's base name.
///
/// One file can satisfy several keys; each produces its own match and the
/// caller decides precedence. Identical pairs collapse.
pub fn find_tool_matches(files: &[PathBuf], icons: &IconMap) -> BTreeSet<ToolMatch> {
    let mut matches = BTreeSet::new();
    for file in files {
        let Some(name) = file.file_name().map(|n| n.to_string_lossy()) else {
            continue;
        };
        for (key, class) in icons {
            if let Some(matched) = find_ignore_case(&name, key) {
                debug!(file = %name, %matched, %class, "tool match");
                matches.insert(ToolMatch {
                    matched,
                    class: class.clone(),
                });
            }
        }
    }
    matches
}
