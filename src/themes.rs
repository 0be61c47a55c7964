//! Locating theme directories on the volume through the `theme*` sections.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::VentoyConfig;
use crate::error::{Error, Result, Warning};

/// Which themes an operation should touch.
#[derive(Debug, Clone, Default)]
pub struct ThemeSelection {
    /// Display name (directory name) of the chosen theme
    pub theme: Option<String>,
    pub all_themes: bool,
    pub all_resolutions: bool,
}

/// Turns a forward-slash path from `ventoy.json` into a path on the volume.
pub fn volume_path(volume: &Path, relative: &str) -> PathBuf {
    relative
        .trim_start_matches('/')
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .fold(volume.to_path_buf(), |path, part| path.join(part))
}

/// Existing theme directories referenced by the document, in document order.
fn theme_dirs(config: &VentoyConfig, volume: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for section in &config.themes {
        for file in section.files() {
            let full = volume_path(volume, file);
            if !full.exists() {
                debug!(section = %section.key, file, "theme file missing");
                continue;
            }
            if let Some(dir) = full.parent() {
                dirs.push(dir.to_path_buf());
            }
        }
    }
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Distinct display names of every theme whose file exists.
pub fn theme_names(config: &VentoyConfig, volume: &Path) -> BTreeSet<String> {
    theme_dirs(config, volume)
        .into_iter()
        .map(|dir| dir_name(&dir))
        .collect()
}

/// Resolves the set of theme directories to receive icons.
///
/// Resolution variants share the part of the name before the first `_`
/// (`DedSec_1920x1080`, `DedSec_2560x1440`); with `all_resolutions` every
/// sibling directory starting with that base is included. If the siblings
/// cannot be listed, only the theme itself is used and a warning is recorded.
pub fn resolve_targets(
    config: &VentoyConfig,
    volume: &Path,
    selection: &ThemeSelection,
    warnings: &mut Vec<Warning>,
) -> Result<BTreeSet<PathBuf>> {
    let mut targets = BTreeSet::new();

    for dir in theme_dirs(config, volume) {
        let name = dir_name(&dir);
        let selected = selection.all_themes || selection.theme.as_deref() == Some(name.as_str());
        if !selected {
            continue;
        }

        if !selection.all_resolutions {
            targets.insert(dir);
            continue;
        }

        let base = name.split('_').next().unwrap_or(&name);
        let Some(parent) = dir.parent() else {
            targets.insert(dir);
            continue;
        };
        match std::fs::read_dir(parent) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let sibling = entry.path();
                    if sibling.is_dir() && entry.file_name().to_string_lossy().starts_with(base) {
                        targets.insert(sibling);
                    }
                }
            }
            Err(e) => {
                warn!(dir = %parent.display(), error = %e, "cannot list resolution variants");
                warnings.push(Warning::VariantsUnlisted {
                    theme: name.clone(),
                    reason: e.to_string(),
                });
                targets.insert(dir);
            }
        }
    }

    if targets.is_empty() {
        return Err(Error::NoTargets(
            "No matching themes found to apply icons.".to_string(),
        ));
    }
    debug!(count = targets.len(), "resolved theme directories");
    Ok(targets)
}
