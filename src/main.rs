use anyhow::Result;
use clap::Parser;
use ventoy_assist::cli::{Cli, Commands};
use ventoy_assist::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Apply(args) => commands::apply::run(&cli, args),
        Commands::Themes(volume) => commands::list::themes(volume),
        Commands::Targets(volume) => commands::list::targets(&cli, volume),
        Commands::Rename { volume, renames } => commands::rename::run(volume, renames),
        Commands::Check(volume) => commands::check::run(volume),
        Commands::Init => commands::init::run(&cli),
    }
}
