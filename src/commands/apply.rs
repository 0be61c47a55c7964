use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::cli::{ApplyArgs, Cli};
use crate::config::{Resolution, Settings};
use crate::document::{document_path, VentoyConfig};
use crate::error::{self, Warning};
use crate::matcher::{discover_images, find_tool_matches, ToolMatch};
use crate::menu_class;
use crate::reconcile::{self, ReconcileOptions};
use crate::themes::{resolve_targets, ThemeSelection};

/// Everything the icon pipeline needs for one run.
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub volume: PathBuf,
    pub selection: ThemeSelection,
    /// Local icon set; ignored with `use_theme_icons`
    pub icon_source: PathBuf,
    pub use_theme_icons: bool,
    pub resolution: Option<Resolution>,
    pub threshold: f64,
    pub bleed: bool,
    pub extensions: Vec<String>,
}

#[derive(Debug)]
pub struct ApplyOutcome {
    pub document: PathBuf,
    pub themes: BTreeSet<PathBuf>,
    pub matches: BTreeSet<ToolMatch>,
    pub menu_class_entries: usize,
    pub warnings: Vec<Warning>,
}

/// Resolves themes, reconciles icons into each, matches icon keys against
/// the images on the volume and writes the merged `menu_class` back.
///
/// `ventoy.json` is read once and written at most once, at the end.
pub fn apply_icons(request: &ApplyRequest) -> error::Result<ApplyOutcome> {
    let document = document_path(&request.volume);
    let mut config = VentoyConfig::load(&document)?;

    let mut warnings = Vec::new();
    let themes = resolve_targets(&config, &request.volume, &request.selection, &mut warnings)?;
    let images = discover_images(&request.volume, &request.extensions, &mut warnings);

    let mut matches = BTreeSet::new();

    for theme_dir in &themes {
        let theme = theme_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let icons_dir = theme_dir.join("icons");
        if !icons_dir.is_dir() {
            warnings.push(Warning::MissingIconsFolder { theme });
            continue;
        }

        let icon_map = if request.use_theme_icons {
            reconcile::theme_icon_map(&icons_dir)?
        } else {
            let size = reconcile::target_icon_size(
                &icons_dir,
                &theme,
                request.resolution,
                &mut warnings,
            );
            debug!(%theme, size, "reconciling icons");
            let opts = ReconcileOptions {
                size,
                threshold: request.threshold,
                bleed: request.bleed,
            };
            let reconciled = reconcile::reconcile_icons(&request.icon_source, &icons_dir, &opts)?;
            warnings.extend(reconciled.warnings);
            reconciled.icons
        };

        matches.extend(find_tool_matches(&images, &icon_map));
    }

    let menu_class_entries = menu_class::apply_matches(&mut config, &matches);
    config.save(&document)?;

    Ok(ApplyOutcome {
        document,
        themes,
        matches,
        menu_class_entries,
        warnings,
    })
}

fn icon_source(args: &ApplyArgs, settings: &Settings) -> PathBuf {
    args.icons.clone().unwrap_or_else(|| settings.icons.dir.clone())
}

pub fn run(cli: &Cli, args: &ApplyArgs) -> Result<()> {
    let settings = Settings::load(&cli.config)?;
    let volume: &Path = &args.volume.volume;

    let request = ApplyRequest {
        volume: volume.to_path_buf(),
        selection: ThemeSelection {
            theme: args.theme.clone(),
            all_themes: args.all_themes,
            all_resolutions: args.all_resolutions,
        },
        icon_source: icon_source(args, &settings),
        use_theme_icons: args.use_theme_icons,
        resolution: args.resolution.or(settings.display.resolution),
        threshold: settings.icons.similarity_threshold,
        bleed: args.bleed || settings.icons.bleed,
        extensions: settings.scan.extensions.clone(),
    };

    let outcome = apply_icons(&request)
        .with_context(|| format!("Failed to apply icons on {}", volume.display()))?;

    for warning in &outcome.warnings {
        println!("{} {}", "!".yellow(), warning);
    }
    for theme in &outcome.themes {
        println!("  {} {}", "·".dimmed(), theme.display());
    }
    println!(
        "{} {} image match(es), {} menu_class entries",
        "✓".green(),
        outcome.matches.len(),
        outcome.menu_class_entries
    );
    println!(
        "{} Updated ventoy.json saved at {}",
        "✓".green(),
        outcome.document.display()
    );
    Ok(())
}
