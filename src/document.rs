//! The `ventoy.json` plugin document.
//!
//! Only the sections this tool edits are typed: `theme*` (read), `menu_class`
//! and `menu_alias` (rewritten). Every other top-level key is carried through
//! untouched, and keys are written back in the order they were read.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

pub const VENTOY_DIR: &str = "ventoy";
pub const DOCUMENT_NAME: &str = "ventoy.json";

const MENU_CLASS: &str = "menu_class";
const MENU_ALIAS: &str = "menu_alias";
const THEME_PREFIX: &str = "theme";

/// Location of `ventoy.json` on a mounted volume.
pub fn document_path(volume: &Path) -> PathBuf {
    volume.join(VENTOY_DIR).join(DOCUMENT_NAME)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct VentoyConfig {
    /// `theme`, `theme_uefi`, `theme2`, ... in document order
    pub themes: Vec<ThemeSection>,
    pub menu_class: Option<Vec<MenuClass>>,
    pub menu_alias: Option<Vec<MenuAlias>>,
    /// Keys this tool does not interpret
    pub extra: Map<String, Value>,
    key_order: Vec<String>,
}

/// One `theme*` object. The body is kept as-is; only `file` is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSection {
    pub key: String,
    pub body: Value,
}

impl ThemeSection {
    /// Paths listed under `file`, which may be a single string or a list.
    pub fn files(&self) -> Vec<&str> {
        match self.body.get("file") {
            Some(Value::String(path)) => vec![path.as_str()],
            Some(Value::Array(paths)) => paths.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A boot-menu classifier rule, evaluated by Ventoy in first-match order.
///
/// Fields besides the selector and `class` are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MenuClass {
    Key {
        key: String,
        class: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Dir {
        dir: String,
        class: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Parent {
        parent: String,
        class: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Other(Value),
}

/// Which field a classifier selects on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectorKind {
    Key,
    Dir,
    Parent,
}

impl MenuClass {
    pub fn key(key: impl Into<String>, class: impl Into<String>) -> Self {
        MenuClass::Key {
            key: key.into(),
            class: class.into(),
            extra: Map::new(),
        }
    }

    pub fn dir(dir: impl Into<String>, class: impl Into<String>) -> Self {
        MenuClass::Dir {
            dir: dir.into(),
            class: class.into(),
            extra: Map::new(),
        }
    }

    pub fn selector(&self) -> Option<(SelectorKind, &str)> {
        match self {
            MenuClass::Key { key, .. } => Some((SelectorKind::Key, key)),
            MenuClass::Dir { dir, .. } => Some((SelectorKind::Dir, dir)),
            MenuClass::Parent { parent, .. } => Some((SelectorKind::Parent, parent)),
            MenuClass::Other(_) => None,
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            MenuClass::Key { class, .. }
            | MenuClass::Dir { class, .. }
            | MenuClass::Parent { class, .. } => Some(class),
            MenuClass::Other(_) => None,
        }
    }

    /// Takes the class of a later entry for the same selector, along with any
    /// extra fields it carries. Fields only this entry has are kept.
    pub fn absorb(&mut self, later: MenuClass) {
        match (self, later) {
            (
                MenuClass::Key { class, extra, .. }
                | MenuClass::Dir { class, extra, .. }
                | MenuClass::Parent { class, extra, .. },
                MenuClass::Key {
                    class: later_class,
                    extra: later_extra,
                    ..
                }
                | MenuClass::Dir {
                    class: later_class,
                    extra: later_extra,
                    ..
                }
                | MenuClass::Parent {
                    class: later_class,
                    extra: later_extra,
                    ..
                },
            ) => {
                *class = later_class;
                extra.extend(later_extra);
            }
            (earlier, later) => *earlier = later,
        }
    }
}

/// A display-name override for an image file or a directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MenuAlias {
    Image {
        image: String,
        alias: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Dir {
        dir: String,
        alias: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Other(Value),
}

impl MenuAlias {
    pub fn image(image: impl Into<String>, alias: impl Into<String>) -> Self {
        MenuAlias::Image {
            image: image.into(),
            alias: alias.into(),
            extra: Map::new(),
        }
    }

    pub fn dir(dir: impl Into<String>, alias: impl Into<String>) -> Self {
        MenuAlias::Dir {
            dir: dir.into(),
            alias: alias.into(),
            extra: Map::new(),
        }
    }
}

impl TryFrom<Map<String, Value>> for VentoyConfig {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let mut config = VentoyConfig::default();

        for (key, value) in map {
            config.key_order.push(key.clone());
            match key.as_str() {
                MENU_CLASS => {
                    let entries = serde_json::from_value(value)
                        .map_err(|e| format!("`{MENU_CLASS}` must be an array: {e}"))?;
                    config.menu_class = Some(entries);
                }
                MENU_ALIAS => {
                    let entries = serde_json::from_value(value)
                        .map_err(|e| format!("`{MENU_ALIAS}` must be an array: {e}"))?;
                    config.menu_alias = Some(entries);
                }
                k if k.starts_with(THEME_PREFIX) && value.is_object() => {
                    config.themes.push(ThemeSection { key, body: value });
                }
                _ => {
                    config.extra.insert(key, value);
                }
            }
        }

        Ok(config)
    }
}

impl From<VentoyConfig> for Map<String, Value> {
    fn from(config: VentoyConfig) -> Self {
        let VentoyConfig {
            themes,
            menu_class,
            menu_alias,
            mut extra,
            key_order,
        } = config;

        let mut themes: Vec<Option<ThemeSection>> = themes.into_iter().map(Some).collect();
        let mut menu_class = menu_class.map(|entries| Value::from_iter(entries.iter().map(to_value)));
        let mut menu_alias = menu_alias.map(|entries| Value::from_iter(entries.iter().map(to_value)));

        let mut map = Map::new();
        for key in key_order {
            let value = match key.as_str() {
                MENU_CLASS => menu_class.take(),
                MENU_ALIAS => menu_alias.take(),
                _ => themes
                    .iter_mut()
                    .find(|slot| slot.as_ref().is_some_and(|t| t.key == key))
                    .and_then(Option::take)
                    .map(|t| t.body)
                    .or_else(|| extra.remove(&key)),
            };
            if let Some(value) = value {
                map.insert(key, value);
            }
        }

        // Sections that did not exist when the document was read.
        for theme in themes.into_iter().flatten() {
            map.insert(theme.key, theme.body);
        }
        map.extend(extra);
        if let Some(value) = menu_class {
            map.insert(MENU_CLASS.to_string(), value);
        }
        if let Some(value) = menu_alias {
            map.insert(MENU_ALIAS.to_string(), value);
        }
        map
    }
}

fn to_value<T: Serialize>(entry: &T) -> Value {
    serde_json::to_value(entry).unwrap_or(Value::Null)
}

impl VentoyConfig {
    /// Reads `ventoy.json`. A missing file is an error; a blank one is an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).map_err(|source| Error::Syntax {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serializes with 4-space indentation and hands off to [`persist_document`].
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = to_pretty_json(self).map_err(|source| Error::Validation {
            path: path.to_path_buf(),
            source,
        })?;
        persist_document(path, &content)
    }

    pub fn menu_class_entries(&self) -> &[MenuClass] {
        self.menu_class.as_deref().unwrap_or_default()
    }

    pub fn menu_alias_entries(&self) -> &[MenuAlias] {
        self.menu_alias.as_deref().unwrap_or_default()
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `content` next to `path`, parses the written file back, and only
/// then renames it over `path`. On a parse failure the temporary file is
/// removed and `path` is left exactly as it was.
pub fn persist_document(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    temp.write_all(content.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| Error::io(temp.path(), e))?;

    let written = std::fs::read_to_string(temp.path()).map_err(|e| Error::io(temp.path(), e))?;
    if let Err(source) = serde_json::from_str::<VentoyConfig>(&written) {
        debug!(path = %temp.path().display(), "discarding invalid rewrite");
        // Dropping `temp` deletes it.
        return Err(Error::Validation {
            path: path.to_path_buf(),
            source,
        });
    }

    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    debug!(path = %path.display(), "saved");
    Ok(())
}
