//! CLI argument definitions for cheat.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cheat")]
#[command(about = "Cheat search and apply engine", version)]
pub struct Args {
    /// Engine settings (TOML)
    #[arg(short, long, value_name = "FILE", env = "CHEAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the entries of a cheat file
    List {
        /// Cheat file (.cht)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Narrow candidate addresses over a series of memory dumps
    Search {
        /// Item width in bits (1, 2, 4, 8, 16, 32); defaults to the config
        #[arg(short, long)]
        width: Option<u32>,
        /// Read multi-byte items as big-endian
        #[arg(long)]
        big_endian: bool,
        /// Dump the search starts from
        #[arg(long, value_name = "FILE")]
        frame: PathBuf,
        /// Search step as QUERY:DUMP, e.g. exact=7:frame1.bin or gt:frame2.bin
        #[arg(short, long, value_name = "QUERY:DUMP")]
        step: Vec<String>,
        /// Maximum number of matches to print
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Save the remaining matches as cheats to this file
        #[arg(long, value_name = "FILE")]
        promote: Option<PathBuf>,
    },
    /// Run the cheat interpreter over a memory dump
    Apply {
        /// Cheat file (.cht)
        file: PathBuf,
        /// Memory dump to patch
        #[arg(long, value_name = "FILE")]
        ram: PathBuf,
        /// Number of frames to run
        #[arg(long, default_value = "1")]
        frames: u32,
        /// Where to write the patched dump (default: overwrite --ram)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
