//! Cheat file load/save tests against real files.

use std::fs;

use cheat_core::cheat::format::KeyValueFile;
use cheat_core::{
    CheatCode, CheatOp, CheatStore, Error, Handler, MemoryPatch, Repeat, RumbleConfig,
    RumbleKind, WidthClass,
};
use tempfile::TempDir;

fn sample_store() -> CheatStore {
    let mut store = CheatStore::new();
    store.push(CheatCode::core_opaque("Infinite lives", "7E0DBE:09").enabled());

    let mut patch = CheatCode::engine_applied(MemoryPatch {
        address: 0x1F00,
        address_bit_mask: 0x30,
        width: WidthClass::Bits2,
        op: CheatOp::RunNextIfGt,
        value: 2,
        big_endian: true,
        repeat: Repeat {
            count: 4,
            add_to_value: 1,
            add_to_address: 2,
        },
        rumble: RumbleConfig {
            kind: RumbleKind::DecreaseByValue,
            value: 1,
            port: 1,
            primary_strength: 0xFFFF,
            primary_duration_ms: 250,
            secondary_strength: 0x1000,
            secondary_duration_ms: 50,
        },
        ..Default::default()
    });
    patch.description = Some("Health \"max\"".to_string());
    store.push(patch);
    store
}

#[test]
fn test_round_trip_preserves_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("game.cht");

    let original = sample_store();
    original.save(&path, true).unwrap();

    let mut loaded = CheatStore::new();
    assert_eq!(loaded.load(&path, false).unwrap(), 2);
    assert_eq!(loaded.as_slice(), original.as_slice());
}

#[test]
fn test_load_append_renumbers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.cht");
    sample_store().save(&path, true).unwrap();

    let mut store = CheatStore::new();
    store.push(CheatCode::core_opaque("Existing", "AAAA"));
    assert_eq!(store.load(&path, true).unwrap(), 2);

    assert_eq!(store.len(), 3);
    let indices: Vec<_> = store.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(store.get(0).unwrap().label(), "Existing");
    assert_eq!(store.get(2).unwrap().handler(), Handler::EngineApplied);
}

#[test]
fn test_failed_load_keeps_list() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.cht");
    fs::write(&empty, "cheats = \"0\"\n").unwrap();

    let mut store = sample_store();
    assert!(matches!(
        store.load(&empty, false),
        Err(Error::Persistence(_))
    ));
    assert!(matches!(
        store.load(dir.path().join("missing.cht"), false),
        Err(Error::Io(_))
    ));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_save_without_overwrite_merges() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("game.cht");
    fs::write(
        &path,
        "# kept\nauthor = \"someone\"\ncheats = \"9\"\ncheat0_desc = \"old\"\n",
    )
    .unwrap();

    let mut store = CheatStore::new();
    store.push(CheatCode::core_opaque("new", "BBBB"));
    store.save(&path, false).unwrap();

    let file = KeyValueFile::load(&path).unwrap();
    assert_eq!(file.get("author"), Some("someone"));
    assert_eq!(file.get("cheats"), Some("1"));
    assert_eq!(file.get("cheat0_desc"), Some("new"));

    store.save(&path, true).unwrap();
    let file = KeyValueFile::load(&path).unwrap();
    assert!(!file.contains("author"));
}

#[test]
fn test_load_legacy_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.cht");
    fs::write(
        &path,
        r#"cheats = 2

cheat0_desc = "Max gold"
cheat0_handler = "1"
cheat0_enable = "true"
cheat0_endian = "true"
cheat0_memory_search_size = "4"
cheat0_cheat_type = "1"
cheat0_address = "0x0040"
cheat0_value = "9999"

cheat1_desc = "Broken"
cheat1_handler = "1"
cheat1_memory_search_size = "9"
cheat1_rumble_type = "77"
"#,
    )
    .unwrap();

    let mut store = CheatStore::new();
    assert_eq!(store.load(&path, false).unwrap(), 2);

    let gold = store.get(0).unwrap();
    assert!(gold.enabled);
    let patch = gold.patch().unwrap();
    assert!(patch.big_endian);
    assert_eq!(patch.width, WidthClass::Bits16);
    assert_eq!(patch.op, CheatOp::Set);
    assert_eq!(patch.address, 0x40);
    assert_eq!(patch.value, 9999);

    let broken = store.get(1).unwrap().patch().unwrap();
    assert_eq!(broken.width, WidthClass::Bits8);
    assert_eq!(broken.rumble.kind, RumbleKind::Disabled);
    assert_eq!(broken.op, CheatOp::Disabled);
}
