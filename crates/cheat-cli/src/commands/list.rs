//! List command: print a cheat file.

use std::path::Path;

use anyhow::Result;
use cheat_core::{CheatCode, CheatKind, CheatStore};
use owo_colors::OwoColorize;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let mut store = CheatStore::new();
    store.load(file, false)?;

    if json {
        println!("{}", serde_json::to_string_pretty(store.as_slice())?);
        return Ok(());
    }

    eprintln!(
        "{} cheats ({} enabled) in {}",
        store.len(),
        store.enabled_count(),
        file.display()
    );
    for cheat in store.iter() {
        println!("{}", format_line(cheat));
    }
    Ok(())
}

fn format_line(cheat: &CheatCode) -> String {
    let marker = if cheat.enabled {
        "ON ".green().bold().to_string()
    } else {
        "OFF".dimmed().to_string()
    };
    let detail = match &cheat.kind {
        CheatKind::CoreOpaque { code } => format!("core code {}", code),
        CheatKind::EngineApplied(patch) => format!(
            "{} {:#x} ({}, mask {:#04x}) value {:#x}",
            patch.op, patch.address, patch.width, patch.address_bit_mask, patch.value
        ),
    };
    format!("{:>3} [{}] {}  {}", cheat.index, marker, cheat.label(), detail)
}
