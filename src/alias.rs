//! Boot-menu aliases: a pending list of renames and its merge into `menu_alias`.

use std::path::Path;

use tracing::debug;

use crate::document::{document_path, MenuAlias, VentoyConfig};
use crate::error::{Error, Result};
use crate::themes::volume_path;

/// A display name to give an image file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    /// Forward-slash path relative to the volume root
    pub path: String,
    pub alias: String,
}

/// Renames staged by the user, at most one per path, in the order last edited.
#[derive(Debug, Default)]
pub struct PendingRenames {
    entries: Vec<RenameEntry>,
}

impl PendingRenames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a rename, replacing any earlier one for the same path.
    pub fn upsert(&mut self, path: impl Into<String>, alias: impl Into<String>) {
        let path = path.into();
        self.entries.retain(|entry| entry.path != path);
        self.entries.push(RenameEntry {
            path,
            alias: alias.into(),
        });
    }

    /// Validates and stages a rename: the path must exist on `volume` and the
    /// trimmed alias must not be empty.
    pub fn stage(&mut self, volume: &Path, path: &str, alias: &str) -> Result<()> {
        let path = path.trim().trim_start_matches('/').replace('\\', "/");
        if path.is_empty() {
            return Err(Error::InvalidRename {
                path,
                reason: "no path selected".to_string(),
            });
        }
        if !volume_path(volume, &path).exists() {
            return Err(Error::InvalidRename {
                reason: "path does not exist on the volume".to_string(),
                path,
            });
        }
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(Error::InvalidRename {
                path,
                reason: "alias is empty".to_string(),
            });
        }
        self.upsert(path, alias);
        Ok(())
    }

    /// Changes the alias of an already staged path. Returns false if the path
    /// is not staged.
    pub fn set_alias(&mut self, path: &str, alias: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => {
                entry.alias = alias.into();
                true
            }
            None => false,
        }
    }

    /// Merges every staged rename into `ventoy.json` on `volume` and clears
    /// the list once the document is saved. Returns the number applied.
    pub fn apply(&mut self, volume: &Path) -> Result<usize> {
        let path = document_path(volume);
        let mut config = VentoyConfig::load(&path)?;
        merge_aliases(&mut config, volume, &self.entries);
        config.save(&path)?;

        let applied = self.entries.len();
        self.entries.clear();
        Ok(applied)
    }
}

/// The `menu_alias` pointer for a relative path: absolute from the volume root.
pub fn pointer(path: &str) -> String {
    format!("/{}", path.replace('\\', "/").trim_start_matches('/'))
}

/// Upserts each rename into `menu_alias`. Directories become `dir` entries,
/// anything else an `image` entry; an existing entry of the same kind and
/// pointer has its alias overwritten in place.
pub fn merge_aliases(config: &mut VentoyConfig, volume: &Path, renames: &[RenameEntry]) {
    let aliases = config.menu_alias.get_or_insert_with(Vec::new);

    for rename in renames {
        let target = pointer(&rename.path);
        let is_dir = volume_path(volume, &rename.path).is_dir();

        let existing = aliases.iter_mut().find_map(|entry| match entry {
            MenuAlias::Dir { dir, alias, .. } if is_dir && *dir == target => Some(alias),
            MenuAlias::Image { image, alias, .. } if !is_dir && *image == target => Some(alias),
            _ => None,
        });

        match existing {
            Some(alias) => {
                debug!(pointer = %target, alias = %rename.alias, "alias updated");
                alias.clone_from(&rename.alias);
            }
            None => {
                debug!(pointer = %target, alias = %rename.alias, "alias added");
                aliases.push(if is_dir {
                    MenuAlias::dir(target, rename.alias.as_str())
                } else {
                    MenuAlias::image(target, rename.alias.as_str())
                });
            }
        }
    }
}
