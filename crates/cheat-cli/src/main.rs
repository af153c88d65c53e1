mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cheat=warn,cheat_core=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = commands::load_config(args.config.as_deref());

    match args.command {
        Command::List { file, json } => commands::list::run(&file, json),
        Command::Search {
            width,
            big_endian,
            frame,
            step,
            limit,
            promote,
        } => commands::search::run(
            config,
            width,
            big_endian,
            &frame,
            &step,
            limit,
            promote.as_deref(),
        ),
        Command::Apply {
            file,
            ram,
            frames,
            output,
        } => commands::apply::run(config, &file, &ram, frames, output.as_deref()),
    }
}
