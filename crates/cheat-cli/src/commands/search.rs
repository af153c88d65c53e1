//! Search command: run a cheat search over a series of dumps.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cheat_core::{CheatEngine, EngineConfig, SearchQuery, WidthClass};

use super::DumpMemory;

/// One `QUERY:DUMP` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub query: SearchQuery,
    pub dump: PathBuf,
}

impl Step {
    pub fn parse(raw: &str) -> Result<Self> {
        let Some((query, dump)) = raw.split_once(':') else {
            bail!("search step '{}' is not QUERY:DUMP", raw);
        };
        Ok(Self {
            query: query.parse()?,
            dump: PathBuf::from(dump),
        })
    }
}

pub fn run(
    mut config: EngineConfig,
    width: Option<u32>,
    big_endian: bool,
    frame: &Path,
    steps: &[String],
    limit: usize,
    promote: Option<&Path>,
) -> Result<()> {
    if let Some(bits) = width {
        config.search_width = WidthClass::from_bits(bits)
            .with_context(|| format!("unsupported item width {} bits", bits))?;
    }
    if big_endian {
        config.search_big_endian = true;
    }
    let steps = steps
        .iter()
        .map(|raw| Step::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut memory = DumpMemory::open(frame, config.region)?;
    let mut engine = CheatEngine::new(config);

    let count = engine.begin_search(&memory)?;
    eprintln!(
        "Search started on {} ({} bytes, {}): {} candidates",
        frame.display(),
        memory.data().len(),
        engine.config().search_width,
        count
    );

    for step in &steps {
        memory.reload(&step.dump)?;
        let remaining = engine.search_step(&memory, step.query)?;
        eprintln!("{} on {}: {} matches", step.query, step.dump.display(), remaining);
    }

    if let Some(search) = engine.search() {
        let current = search.current(&memory)?;
        for view in search.views(current).take(limit) {
            println!(
                "#{:<5} {:#08x} mask {:#04x}  prev {:#x}  curr {:#x}",
                view.index, view.address, view.address_bit_mask, view.previous, view.current
            );
        }
        if search.num_matches() > limit {
            eprintln!("... {} more", search.num_matches() - limit);
        }
    }

    if let Some(out) = promote {
        let added = engine.add_matches(&memory)?;
        engine.save(out, true)?;
        eprintln!("Saved {} cheats to {}", added, out.display());
    }

    Ok(())
}
