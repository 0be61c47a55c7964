use anyhow::Result;
use colored::Colorize;

use crate::cli::{Cli, VolumeArgs};
use crate::config::Settings;
use crate::document::{document_path, VentoyConfig};
use crate::matcher::alias_targets;
use crate::themes::theme_names;

pub fn themes(volume: &VolumeArgs) -> Result<()> {
    let config = VentoyConfig::load(&document_path(&volume.volume))?;
    let names = theme_names(&config, &volume.volume);

    if names.is_empty() {
        println!("{} No themes found", "!".yellow());
        return Ok(());
    }
    println!("{}", "Themes".bold());
    for name in &names {
        println!("  {name}");
    }
    Ok(())
}

pub fn targets(cli: &Cli, volume: &VolumeArgs) -> Result<()> {
    let settings = Settings::load(&cli.config)?;
    let mut warnings = Vec::new();
    let targets = alias_targets(&volume.volume, &settings.scan.extensions, &mut warnings);

    for warning in &warnings {
        println!("{} {}", "!".yellow(), warning);
    }

    if targets.is_empty() {
        println!("{} No bootable images found", "!".yellow());
        return Ok(());
    }
    for target in &targets {
        println!("{target}");
    }
    println!("\nTotal: {}", targets.len());
    Ok(())
}
