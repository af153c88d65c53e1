//! Apply command: run the interpreter over a dump.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use cheat_core::{CheatEngine, EngineConfig, FrameStats, Haptics, NoCoreCheats, RumbleChannel};
use tracing::info;

use super::DumpMemory;

/// Logs rumble requests instead of driving a device.
struct LogHaptics;

impl Haptics for LogHaptics {
    fn set_rumble(&mut self, port: u32, channel: RumbleChannel, strength: u16) {
        info!("Rumble port {} {:?} -> {}", port, channel, strength);
    }
}

pub fn run(
    config: EngineConfig,
    file: &Path,
    ram: &Path,
    frames: u32,
    output: Option<&Path>,
) -> Result<()> {
    let mut memory = DumpMemory::open(ram, config.region)?;
    let mut engine = CheatEngine::new(config);
    engine.load(file, false, &mut NoCoreCheats)?;

    let mut total = FrameStats::default();
    for _ in 0..frames {
        let stats = engine.run_frame(&mut memory, &mut LogHaptics, Instant::now());
        total.evaluated += stats.evaluated;
        total.skipped += stats.skipped;
        total.writes += stats.writes;
        total.out_of_range += stats.out_of_range;
    }

    let output = output.unwrap_or(ram);
    fs::write(output, memory.data())
        .with_context(|| format!("writing dump {}", output.display()))?;

    eprintln!(
        "{} frames: {} evaluated, {} skipped, {} writes, {} out of range",
        frames, total.evaluated, total.skipped, total.writes, total.out_of_range
    );
    eprintln!("Wrote {}", output.display());
    Ok(())
}
