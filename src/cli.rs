use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Resolution, SETTINGS_NAME};

#[derive(Parser)]
#[command(
    name = "ventoy-assist",
    about = "Apply icon sets, boot-menu classes and aliases to a Ventoy USB drive"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the settings file
    #[arg(long, global = true, default_value = SETTINGS_NAME)]
    pub config: PathBuf,

    /// Print debug diagnostics to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// The mounted Ventoy data partition.
#[derive(Args, Clone, Debug)]
pub struct VolumeArgs {
    /// Root of the Ventoy volume (e.g. E:\ or /run/media/user/Ventoy)
    #[arg(long)]
    pub volume: PathBuf,
}

#[derive(Args, Clone, Debug)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub volume: VolumeArgs,

    /// Theme to apply icons to (its directory name)
    #[arg(long, required_unless_present = "all_themes")]
    pub theme: Option<String>,

    /// Apply icons to all themes
    #[arg(long)]
    pub all_themes: bool,

    /// Apply icons to all resolutions of the selected theme
    #[arg(long)]
    pub all_resolutions: bool,

    /// Use the theme's own icons folder instead of the local icon set
    #[arg(long)]
    pub use_theme_icons: bool,

    /// Local icon set directory (overrides settings)
    #[arg(long)]
    pub icons: Option<PathBuf>,

    /// Logical display resolution, e.g. 2560x1440 (overrides settings)
    #[arg(long)]
    pub resolution: Option<Resolution>,

    /// Bleed colour into transparent pixels before resizing
    #[arg(long)]
    pub bleed: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy icons into themes and classify boot images by name
    Apply(ApplyArgs),

    /// List themes configured in ventoy.json
    Themes(VolumeArgs),

    /// List images and directories that can be given an alias
    Targets(VolumeArgs),

    /// Give boot images or directories a display alias
    Rename {
        #[command(flatten)]
        volume: VolumeArgs,

        /// PATH=ALIAS pairs; PATH is relative to the volume root
        #[arg(required = true, value_parser = parse_rename)]
        renames: Vec<(String, String)>,
    },

    /// Validate ventoy.json and summarize it
    Check(VolumeArgs),

    /// Create a default ventoy-assist.toml
    Init,
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(path, alias)| (path.to_string(), alias.to_string()))
        .ok_or_else(|| format!("expected PATH=ALIAS, got '{s}'"))
}
