//! Copying the local icon set into a theme's `icons/` folder.
//!
//! A theme may already ship an icon under the same name. The incoming icon is
//! then written as `<key>-alt.png` and compared against the shipped one; if
//! the two look the same the alt copy is dropped and the shipped icon is used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Resolution;
use crate::error::{Error, Result, Warning};
use crate::icon;
use crate::similarity;

pub const ALT_SUFFIX: &str = "-alt";
pub const DEFAULT_ICON_SIZE: u32 = 32;

/// Icon key (source file stem) to the name of the icon it resolved to.
pub type IconMap = BTreeMap<String, String>;

/// Common display resolutions and the icon size themes typically use at each.
const RESOLUTION_ICON_SIZES: &[(u32, u32, u32)] = &[
    (1920, 1080, 32),
    (2560, 1080, 32),
    (2560, 1440, 48),
    (3440, 1440, 48),
    (3840, 2160, 64),
];

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub size: u32,
    /// Percent similarity at or above which the shipped icon wins
    pub threshold: f64,
    pub bleed: bool,
}

#[derive(Debug, Default)]
pub struct Reconciliation {
    pub icons: IconMap,
    pub warnings: Vec<Warning>,
}

/// Icon size for the display resolution closest (by Manhattan distance) to `resolution`.
pub fn icon_size_for_resolution(resolution: Option<Resolution>) -> u32 {
    let Some(res) = resolution else {
        return DEFAULT_ICON_SIZE;
    };
    RESOLUTION_ICON_SIZES
        .iter()
        .min_by_key(|(w, h, _)| res.width.abs_diff(*w) + res.height.abs_diff(*h))
        .map_or(DEFAULT_ICON_SIZE, |&(_, _, size)| size)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// `.png` files directly inside `dir`, sorted by file name.
pub fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut pngs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_png(path))
        .collect();
    pngs.sort();
    Ok(pngs)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Picks the size new icons are drawn at in `icons_dir`.
///
/// The width of `ubuntu.png` wins when present; otherwise the first `.png` by
/// name. With no icons, an unlistable folder or an unreadable probe, the
/// resolution table decides.
pub fn target_icon_size(
    icons_dir: &Path,
    theme: &str,
    resolution: Option<Resolution>,
    warnings: &mut Vec<Warning>,
) -> u32 {
    let pngs = match list_pngs(icons_dir) {
        Ok(pngs) => pngs,
        Err(e) => {
            warnings.push(Warning::IconsUnlisted {
                theme: theme.to_string(),
                reason: e.to_string(),
            });
            return icon_size_for_resolution(resolution);
        }
    };
    let probe = pngs
        .iter()
        .find(|path| file_name(path) == "ubuntu.png")
        .or_else(|| pngs.first());

    let Some(probe) = probe else {
        return icon_size_for_resolution(resolution);
    };
    match icon::probe_width(probe) {
        Ok(width) if width > 0 => width,
        Ok(_) => icon_size_for_resolution(resolution),
        Err(e) => {
            warnings.push(Warning::SizeProbeFailed {
                theme: theme.to_string(),
                icon: file_name(probe),
                reason: e.to_string(),
            });
            icon_size_for_resolution(resolution)
        }
    }
}

/// Icon map for a theme's own icon set: every `.png` maps to itself.
pub fn theme_icon_map(icons_dir: &Path) -> Result<IconMap> {
    Ok(list_pngs(icons_dir)?
        .iter()
        .map(|path| (stem(path), stem(path)))
        .collect())
}

/// Resizes every `.png` in `source` into `dest`, resolving name collisions.
///
/// Per-icon failures become warnings and leave the icon out of the map. Only
/// an unreadable `source` directory fails the whole call.
pub fn reconcile_icons(source: &Path, dest: &Path, opts: &ReconcileOptions) -> Result<Reconciliation> {
    let mut result = Reconciliation::default();

    for src in list_pngs(source)? {
        let key = stem(&src);
        let dest_path = dest.join(file_name(&src));

        if !dest_path.exists() {
            match icon::render_icon(&src, opts.size, opts.bleed)
                .and_then(|img| icon::save_png(&img, &dest_path))
            {
                Ok(()) => {
                    debug!(icon = %key, "copied");
                    result.icons.insert(key.clone(), key);
                }
                Err(e) => result.warnings.push(Warning::IconSkipped {
                    icon: file_name(&src),
                    reason: reason(&e),
                }),
            }
            continue;
        }

        let alt_key = format!("{key}{ALT_SUFFIX}");
        let alt_path = dest.join(format!("{alt_key}.png"));

        let rendered = match icon::render_icon(&src, opts.size, opts.bleed)
            .and_then(|img| icon::save_png(&img, &alt_path).map(|()| img))
        {
            Ok(img) => img,
            Err(e) => {
                result.warnings.push(Warning::IconSkipped {
                    icon: file_name(&src),
                    reason: reason(&e),
                });
                continue;
            }
        };

        let score = icon::load_rgba(&dest_path)
            .map_err(|e| reason(&e))
            .and_then(|shipped| similarity::icon_similarity(&shipped, &rendered, opts.size));

        let resolved = match score {
            Err(e) => {
                result.warnings.push(Warning::SimilarityFailed {
                    icon: key.clone(),
                    reason: e,
                });
                alt_key
            }
            Ok(score) if score >= opts.threshold => {
                debug!(icon = %key, score, "matches the theme's icon");
                match std::fs::remove_file(&alt_path) {
                    Ok(()) => key.clone(),
                    Err(e) => {
                        result.warnings.push(Warning::AltNotRemoved {
                            icon: key.clone(),
                            reason: e.to_string(),
                        });
                        alt_key
                    }
                }
            }
            Ok(score) => {
                debug!(icon = %key, score, "differs from the theme's icon");
                alt_key
            }
        };
        result.icons.insert(key, resolved);
    }

    Ok(result)
}

fn reason(error: &Error) -> String {
    match error {
        Error::Processing { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
