use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::alias::PendingRenames;
use crate::cli::VolumeArgs;

pub fn run(volume: &VolumeArgs, renames: &[(String, String)]) -> Result<()> {
    let volume = &volume.volume;

    let mut pending = PendingRenames::new();
    for (path, alias) in renames {
        pending.stage(volume, path, alias)?;
    }
    if pending.is_empty() {
        bail!("Nothing to rename");
    }

    println!("Staged {} rename(s)", pending.len());
    for entry in pending.entries() {
        println!("  {} {} {}", entry.path.bold(), "->".dimmed(), entry.alias);
    }

    let applied = pending
        .apply(volume)
        .with_context(|| format!("Failed to rename on {}", volume.display()))?;

    println!("{} Applied {applied} alias(es)", "✓".green());
    Ok(())
}
