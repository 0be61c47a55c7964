use std::collections::BTreeSet;

use anyhow::Result;
use colored::Colorize;

use crate::cli::VolumeArgs;
use crate::document::{document_path, MenuClass, VentoyConfig};
use crate::themes::theme_names;

pub fn run(volume: &VolumeArgs) -> Result<()> {
    let volume = &volume.volume;
    let path = document_path(volume);

    let config = VentoyConfig::load(&path)?;
    println!("{} ventoy.json is valid ({})", "✓".green(), path.display());

    let names = theme_names(&config, volume);
    if names.is_empty() {
        println!(
            "{} No themes found. Apply a theme with the Ventoy theme plugin first.",
            "!".yellow()
        );
    } else {
        println!("{} {} theme(s)", "✓".green(), names.len());
    }

    let classes = config.menu_class_entries();
    let unrecognized = classes
        .iter()
        .filter(|entry| matches!(entry, MenuClass::Other(_)))
        .count();
    let distinct: BTreeSet<&str> = classes.iter().filter_map(MenuClass::class).collect();
    println!(
        "  menu_class: {} entries, {} icon classes",
        classes.len(),
        distinct.len()
    );
    if unrecognized > 0 {
        println!(
            "{} {unrecognized} menu_class entries have no key/dir/parent selector",
            "!".yellow()
        );
    }
    println!("  menu_alias: {} entries", config.menu_alias_entries().len());
    Ok(())
}
