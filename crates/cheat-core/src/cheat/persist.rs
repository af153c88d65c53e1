//! Cheat list load/save.
//!
//! One numbered record per entry (`cheat{i}_<field>`) under a `cheats = N`
//! header. Loading degrades per field: a missing or unparsable number reads
//! as 0 (or the zero variant of an enum) instead of rejecting the file.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::memory::WidthClass;
use crate::search::parse_value;

use super::code::{
    CheatCode, CheatKind, CheatOp, Handler, MemoryPatch, Repeat, RumbleConfig, RumbleKind,
};
use super::format::KeyValueFile;
use super::store::CheatStore;

const COUNT_KEY: &str = "cheats";

impl CheatStore {
    /// Load a cheat file, replacing the list or appending to it.
    ///
    /// Fails and leaves the list untouched if the file is unreadable or
    /// holds no records. Returns the number of records loaded.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, append: bool) -> Result<usize> {
        let path = path.as_ref();
        let file = KeyValueFile::load(path)?;
        let cheats = read_cheats(&file)?;
        let count = cheats.len();

        // Entries already in the list keep their runtime state
        let first = if append { self.len() } else { 0 };
        if append {
            self.extend(cheats);
        } else {
            self.replace(cheats);
        }
        self.reset_runtime_from(first);

        info!(
            "Loaded {} cheats from {:?}{}",
            count,
            path,
            if append { " (appended)" } else { "" }
        );
        Ok(count)
    }

    /// Save the list. Without `overwrite`, keys of an existing file that this
    /// list does not write are kept.
    pub fn save<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<()> {
        let path = path.as_ref();
        let mut file = if !overwrite && path.exists() {
            KeyValueFile::load(path)?
        } else {
            KeyValueFile::new()
        };
        write_cheats(&mut file, self.as_slice());

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        file.save(path)?;

        info!("Saved {} cheats to {:?}", self.len(), path);
        Ok(())
    }
}

/// Decode every record of a parsed cheat file.
pub fn read_cheats(file: &KeyValueFile) -> Result<Vec<CheatCode>> {
    let declared = file.get(COUNT_KEY).and_then(parse_value).unwrap_or(0) as usize;
    if declared == 0 {
        return Err(Error::Persistence("file contains no cheats".to_string()));
    }

    // Every record needs at least one key; a larger header is corrupt
    let count = if declared > file.len() {
        warn!(
            "Cheat count {} exceeds {} keys in file, truncating",
            declared,
            file.len()
        );
        file.len()
    } else {
        declared
    };

    Ok((0..count).map(|i| read_record(file, i)).collect())
}

/// Encode `cheats` into `file`, replacing any keys already present.
pub fn write_cheats(file: &mut KeyValueFile, cheats: &[CheatCode]) {
    file.set(COUNT_KEY, cheats.len().to_string());
    for (i, cheat) in cheats.iter().enumerate() {
        write_record(file, i, cheat);
    }
}

struct Record<'a> {
    file: &'a KeyValueFile,
    index: usize,
}

impl Record<'_> {
    fn key(&self, field: &str) -> String {
        format!("cheat{}_{}", self.index, field)
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.file.get(&self.key(field))
    }

    fn number(&self, field: &str) -> u32 {
        match self.text(field) {
            None => {
                debug!("cheat{}_{} missing, using 0", self.index, field);
                0
            }
            Some(raw) => parse_value(raw).unwrap_or_else(|| {
                warn!(
                    "cheat{}_{} = {:?} is not a number, using 0",
                    self.index, field, raw
                );
                0
            }),
        }
    }

    fn number_or(&self, field: &str, default: u32) -> u32 {
        if self.text(field).is_some() {
            self.number(field)
        } else {
            default
        }
    }

    fn flag(&self, field: &str) -> Option<bool> {
        self.text(field).map(|raw| {
            let raw = raw.trim();
            raw.eq_ignore_ascii_case("true") || raw == "1"
        })
    }

    fn strength(&self, field: &str) -> u16 {
        let raw = self.number(field);
        u16::try_from(raw).unwrap_or_else(|_| {
            warn!(
                "cheat{}_{} = {} exceeds {}, clamping",
                self.index,
                field,
                raw,
                u16::MAX
            );
            u16::MAX
        })
    }

    fn code<T: Default>(&self, field: &str, decode: impl Fn(u8) -> Option<T>) -> T {
        let raw = self.number(field);
        u8::try_from(raw).ok().and_then(decode).unwrap_or_else(|| {
            if raw != 0 {
                warn!(
                    "cheat{}_{} = {} is out of range, using default",
                    self.index, field, raw
                );
            }
            T::default()
        })
    }
}

fn read_record(file: &KeyValueFile, index: usize) -> CheatCode {
    let record = Record { file, index };

    let description = record.text("desc").map(str::to_string);
    let enabled = record.flag("enable").unwrap_or(false);

    let kind = match record.code("handler", Handler::from_u8) {
        Handler::CoreOpaque => CheatKind::CoreOpaque {
            code: record.text("code").unwrap_or_default().to_string(),
        },
        Handler::EngineApplied => {
            let big_endian = record
                .flag("big_endian")
                .or_else(|| record.flag("endian"))
                .unwrap_or(false);
            let defaults = Repeat::default();
            CheatKind::EngineApplied(MemoryPatch {
                address: record.number("address"),
                address_bit_mask: record.number("address_bit_position"),
                width: record.code("memory_search_size", WidthClass::from_u8),
                op: record.code("cheat_type", CheatOp::from_u8),
                value: record.number("value"),
                big_endian,
                repeat: Repeat {
                    count: record.number_or("repeat_count", defaults.count),
                    add_to_value: record.number_or("repeat_add_to_value", defaults.add_to_value),
                    add_to_address: record
                        .number_or("repeat_add_to_address", defaults.add_to_address),
                },
                rumble: RumbleConfig {
                    kind: record.code("rumble_type", RumbleKind::from_u8),
                    value: record.number("rumble_value"),
                    port: record.number("rumble_port"),
                    primary_strength: record.strength("rumble_primary_strength"),
                    primary_duration_ms: record.number("rumble_primary_duration"),
                    secondary_strength: record.strength("rumble_secondary_strength"),
                    secondary_duration_ms: record.number("rumble_secondary_duration"),
                },
                ..Default::default()
            })
        }
    };

    CheatCode {
        index: index as u32,
        description,
        enabled,
        kind,
    }
}

fn write_record(file: &mut KeyValueFile, index: usize, cheat: &CheatCode) {
    let desc_key = format!("cheat{}_desc", index);
    match &cheat.description {
        Some(desc) => file.set(&desc_key, desc.as_str()),
        None => {
            file.remove(&desc_key);
        }
    }

    let mut put = |field: &str, value: String| {
        file.set(&format!("cheat{}_{}", index, field), value);
    };

    put("code", cheat.code().unwrap_or_default().to_string());
    put("enable", cheat.enabled.to_string());
    put("handler", (cheat.handler() as u8).to_string());

    let Some(patch) = cheat.patch() else {
        return;
    };
    put("big_endian", patch.big_endian.to_string());
    put("memory_search_size", (patch.width as u8).to_string());
    put("cheat_type", (patch.op as u8).to_string());
    put("value", patch.value.to_string());
    put("address", patch.address.to_string());
    put("address_bit_position", patch.address_bit_mask.to_string());
    put("rumble_type", (patch.rumble.kind as u8).to_string());
    put("rumble_value", patch.rumble.value.to_string());
    put("rumble_port", patch.rumble.port.to_string());
    put(
        "rumble_primary_strength",
        patch.rumble.primary_strength.to_string(),
    );
    put(
        "rumble_primary_duration",
        patch.rumble.primary_duration_ms.to_string(),
    );
    put(
        "rumble_secondary_strength",
        patch.rumble.secondary_strength.to_string(),
    );
    put(
        "rumble_secondary_duration",
        patch.rumble.secondary_duration_ms.to_string(),
    );
    put("repeat_count", patch.repeat.count.to_string());
    put("repeat_add_to_value", patch.repeat.add_to_value.to_string());
    put(
        "repeat_add_to_address",
        patch.repeat.add_to_address.to_string(),
    );
}
