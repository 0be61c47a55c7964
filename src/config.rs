use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const SETTINGS_NAME: &str = "ventoy-assist.toml";

/// Contents of `ventoy-assist.toml`. Every section is optional.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub icons: IconSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub scan: ScanSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IconSettings {
    /// Local icon set copied into themes (default: "icons")
    #[serde(default = "default_icon_dir")]
    pub dir: PathBuf,

    /// Bleed colour into transparent pixels before resizing (default: false)
    #[serde(default)]
    pub bleed: bool,

    /// Percent SSIM at or above which a shipped icon counts as the same (default: 90)
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            dir: default_icon_dir(),
            bleed: false,
            similarity_threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Logical display resolution used to pick a default icon size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScanSettings {
    /// Bootable image extensions, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

/// A `WIDTHxHEIGHT` pair such as `2560x1440`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
        let height = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
        Ok(Resolution { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn default_icon_dir() -> PathBuf {
    PathBuf::from("icons")
}

fn default_threshold() -> f64 {
    90.0
}

fn default_extensions() -> Vec<String> {
    ["iso", "wim", "img", "vhd", "vhdx"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Settings {
    /// Loads settings, falling back to defaults when the file does not exist.
    /// A relative `icons.dir` is resolved against the settings file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut settings: Settings = toml::from_str(&content)
            .map_err(|e| Error::Settings(format!("Failed to parse {}: {e}", path.display())))?;

        let settings_dir = path.parent().unwrap_or(Path::new("."));
        if settings.icons.dir.is_relative() {
            settings.icons.dir = settings_dir.join(&settings.icons.dir);
        }
        settings.scan.extensions = settings
            .scan
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let threshold = self.icons.similarity_threshold;
        if !(-100.0..=100.0).contains(&threshold) {
            return Err(Error::Settings(format!(
                "icons.similarity_threshold must be between -100 and 100, got {threshold}"
            )));
        }
        if self.scan.extensions.is_empty() {
            return Err(Error::Settings(
                "scan.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_template() -> String {
        r#"# ventoy-assist settings

# Local icon set
# [icons]
# dir = "icons"                # PNGs named after the tool they depict, e.g. ubuntu.png
# bleed = false                # Bleed colour into transparent pixels before resizing
# similarity_threshold = 90    # Percent SSIM at which a theme's own icon is kept instead

# Display used to pick an icon size when a theme ships no icons
# [display]
# resolution = "1920x1080"     # 1920x1080 -> 32px, 2560x1440 -> 48px, 3840x2160 -> 64px

# Bootable images scanned on the volume
# [scan]
# extensions = ["iso", "wim", "img", "vhd", "vhdx"]
"#
        .to_string()
    }
}
