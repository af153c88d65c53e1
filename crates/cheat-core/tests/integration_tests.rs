//! Integration tests for cheat-core
//!
//! These tests drive search, cheat list and interpreter together through the
//! public API, using the mock core from `cheat_core::memory::mock`.

use std::time::{Duration, Instant};

use cheat_core::cheat::rumble::RumbleState;
use cheat_core::config::rumble::WARMUP_EVALUATIONS;
use cheat_core::memory::MockMemoryBuilder;
use cheat_core::memory::mock::RecordingHaptics;
use cheat_core::{
    CheatCode, CheatEngine, CheatOp, EngineConfig, Error, MatchAction, MemoryPatch, NoHaptics,
    RumbleChannel, RumbleConfig, RumbleKind, SearchQuery, WidthClass, apply_frame,
};

/// Deterministic filler so scenarios do not depend on an all-zero region.
fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8 % 16
        })
        .collect()
}

mod search_tests {
    use super::*;

    #[test]
    fn test_exact_query_counts_equal_bytes() {
        let data = noise(4096, 1);
        let expected = data.iter().filter(|&&b| b == 7).count();
        let memory = MockMemoryBuilder::new().write_bytes(0, &data).build();

        let mut engine = CheatEngine::new(EngineConfig::default());
        assert_eq!(engine.begin_search(&memory).unwrap(), 4096);
        let remaining = engine.search_step(&memory, SearchQuery::Exact(7)).unwrap();

        assert!(expected > 0);
        assert_eq!(remaining, expected);
    }

    #[test]
    fn test_match_count_never_increases() {
        let mut memory = MockMemoryBuilder::new()
            .write_bytes(0, &noise(512, 2))
            .build();
        let mut engine = CheatEngine::new(EngineConfig::default());
        let mut last = engine.begin_search(&memory).unwrap();

        let queries = [
            SearchQuery::Neq,
            SearchQuery::Gte,
            SearchQuery::Eq,
            SearchQuery::Lte,
            SearchQuery::EqPlus(1),
            SearchQuery::Lt,
        ];
        for (step, query) in queries.into_iter().enumerate() {
            let next = noise(512, 10 + step as u32);
            memory.ram_mut().copy_from_slice(&next);
            let count = engine.search_step(&memory, query).unwrap();
            assert!(count <= last, "{} grew {} -> {}", query, last, count);
            last = count;
        }
    }

    #[test]
    fn test_track_decreasing_counter() {
        // Lives counter at 0x40 drops 3 -> 2 -> 1 while other bytes churn
        let mut memory = MockMemoryBuilder::new()
            .write_bytes(0, &noise(256, 3))
            .write_u8(0x40, 3)
            .build();
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.begin_search(&memory).unwrap();
        engine.search_step(&memory, SearchQuery::Exact(3)).unwrap();

        for (round, lives) in [2u8, 1].into_iter().enumerate() {
            memory
                .ram_mut()
                .copy_from_slice(&noise(256, 20 + round as u32));
            memory.ram_mut()[0x40] = lives;
            engine.search_step(&memory, SearchQuery::EqMinus(1)).unwrap();
        }

        let search = engine.search().unwrap();
        let current = search.current(&memory).unwrap();
        let addresses: Vec<_> = search.views(current).map(|v| v.address).collect();
        assert!(addresses.contains(&0x40));

        // Pin the counter and let the interpreter hold it
        let index = search
            .views(current)
            .find(|v| v.address == 0x40)
            .map(|v| v.index)
            .unwrap();
        engine
            .match_action(&memory, MatchAction::Copy, index)
            .unwrap();
        engine.store_mut().toggle(0).unwrap();

        memory.ram_mut()[0x40] = 0;
        engine.run_frame(&mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory.ram()[0x40], 1);
    }

    #[test]
    fn test_promote_limit_leaves_store_unchanged() {
        let memory = MockMemoryBuilder::new().with_size(101).build();
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.begin_search(&memory).unwrap();

        assert!(matches!(
            engine.add_matches(&memory),
            Err(Error::TooManyMatches { matches: 101, .. })
        ));
        assert!(engine.store().is_empty());

        engine.search_step(&memory, SearchQuery::Eq).unwrap();
        engine
            .match_action(&memory, MatchAction::Delete, 0)
            .unwrap();
        assert_eq!(engine.add_matches(&memory).unwrap(), 100);
        assert_eq!(engine.store().len(), 100);
    }

    #[test]
    fn test_four_bit_search_promotes_nibble_patches() {
        let mut memory = MockMemoryBuilder::new().write_u8(0, 0x5A).build();
        let mut engine = CheatEngine::new(EngineConfig {
            search_width: WidthClass::Bits4,
            ..Default::default()
        });
        assert_eq!(engine.begin_search(&memory).unwrap(), 2);
        assert_eq!(
            engine.search_step(&memory, SearchQuery::Exact(5)).unwrap(),
            1
        );
        engine.add_matches(&memory).unwrap();
        engine.store_mut().toggle(0).unwrap();

        let patch = engine.store().get(0).unwrap().patch().unwrap().clone();
        assert_eq!(patch.address_bit_mask, 0xF0);
        assert_eq!(patch.value, 5);

        memory.ram_mut()[0] = 0x0A;
        engine.run_frame(&mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory.ram()[0], 0x5A);
    }
}

mod interpreter_tests {
    use super::*;

    fn conditional_pair() -> Vec<CheatCode> {
        vec![
            CheatCode::engine_applied(MemoryPatch {
                address: 0,
                op: CheatOp::RunNextIfEq,
                value: 5,
                ..Default::default()
            })
            .enabled(),
            CheatCode::engine_applied(MemoryPatch {
                address: 1,
                op: CheatOp::Set,
                value: 99,
                ..Default::default()
            })
            .enabled(),
        ]
    }

    #[test]
    fn test_conditional_true_runs_next() {
        let mut cheats = conditional_pair();
        let mut memory = [5u8, 0, 0];
        apply_frame(&mut cheats, &mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory, [5, 99, 0]);
    }

    #[test]
    fn test_conditional_false_skips_next() {
        let mut cheats = conditional_pair();
        let mut memory = [4u8, 0, 0];
        let stats = apply_frame(&mut cheats, &mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory, [4, 0, 0]);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_increase_wraps_eight_bit() {
        let mut cheats = vec![CheatCode::engine_applied(MemoryPatch {
            address: 0,
            op: CheatOp::Increase,
            value: 10,
            ..Default::default()
        })
        .enabled()];
        let mut memory = [250u8];
        apply_frame(&mut cheats, &mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory, [4]);
    }

    #[test]
    fn test_disabled_entries_do_not_consume_skip() {
        let mut cheats = conditional_pair();
        cheats.insert(
            1,
            CheatCode::engine_applied(MemoryPatch {
                address: 2,
                op: CheatOp::Set,
                value: 7,
                ..Default::default()
            }),
        );
        let mut memory = [4u8, 0, 0];
        apply_frame(&mut cheats, &mut memory, &mut NoHaptics, Instant::now());
        assert_eq!(memory, [4, 0, 0]);
    }
}

mod rumble_tests {
    use super::*;

    fn watcher() -> CheatCode {
        CheatCode::engine_applied(MemoryPatch {
            address: 0,
            op: CheatOp::Disabled,
            rumble: RumbleConfig {
                kind: RumbleKind::Changes,
                port: 0,
                primary_strength: 0xFFFF,
                primary_duration_ms: 200,
                secondary_strength: 0x4000,
                secondary_duration_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        })
        .enabled()
    }

    #[test]
    fn test_warmup_suppresses_then_pulse_fires() {
        let mut memory = MockMemoryBuilder::new().with_size(1).build();
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.store_mut().push(watcher());

        let mut haptics = RecordingHaptics::new();
        let start = Instant::now();
        for frame in 0..WARMUP_EVALUATIONS {
            memory.ram_mut()[0] = frame as u8;
            engine.run_frame(&mut memory, &mut haptics, start);
        }
        assert!(haptics.events.is_empty());

        memory.ram_mut()[0] = memory.ram()[0].wrapping_add(1);
        engine.run_frame(&mut memory, &mut haptics, start);
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0xFFFF]);
        // Zero-length secondary pulse ends immediately
        assert_eq!(haptics.channel(RumbleChannel::Weak), vec![0]);

        haptics.clear();
        engine.run_frame(&mut memory, &mut haptics, start + Duration::from_millis(300));
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0]);
    }

    /// Warm the watcher up and fire one pulse on the strong motor.
    fn fire_pulse(
        engine: &mut CheatEngine,
        memory: &mut cheat_core::memory::MockCoreMemory,
        haptics: &mut RecordingHaptics,
        now: Instant,
    ) {
        for _ in 0..WARMUP_EVALUATIONS {
            engine.run_frame(memory, haptics, now);
        }
        memory.ram_mut()[0] = memory.ram()[0].wrapping_add(1);
        engine.run_frame(memory, haptics, now);
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0xFFFF]);
        haptics.clear();
    }

    #[test]
    fn test_disable_mid_pulse_stops_motor() {
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.store_mut().push(watcher());
        let mut memory = MockMemoryBuilder::new().with_size(1).build();
        let mut haptics = RecordingHaptics::new();
        let start = Instant::now();
        fire_pulse(&mut engine, &mut memory, &mut haptics, start);

        assert!(!engine.store_mut().toggle(0).unwrap());
        engine.run_frame(&mut memory, &mut haptics, start + Duration::from_millis(10));
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0]);
        assert!(haptics.channel(RumbleChannel::Weak).is_empty());

        haptics.clear();
        engine.run_frame(&mut memory, &mut haptics, start + Duration::from_millis(20));
        assert!(haptics.events.is_empty());
    }

    #[test]
    fn test_reenable_mid_pulse_stops_motor() {
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.store_mut().push(watcher());
        let mut memory = MockMemoryBuilder::new().with_size(1).build();
        let mut haptics = RecordingHaptics::new();
        let start = Instant::now();
        fire_pulse(&mut engine, &mut memory, &mut haptics, start);

        engine.store_mut().toggle(0).unwrap();
        engine.store_mut().toggle(0).unwrap();
        engine.run_frame(&mut memory, &mut haptics, start + Duration::from_millis(10));
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0]);
        let state = engine.store().get(0).unwrap().patch().unwrap().rumble_state();
        assert!(state.is_warming_up());
        assert!(!state.is_pulsing());
    }

    #[test]
    fn test_append_load_keeps_existing_warmup() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("watch.cht");
        let mut saved = cheat_core::CheatStore::new();
        saved.push(watcher());
        saved.save(&path, true).unwrap();

        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.store_mut().push(watcher());
        let mut memory = MockMemoryBuilder::new().with_size(1).build();
        for _ in 0..WARMUP_EVALUATIONS {
            engine.run_frame(&mut memory, &mut NoHaptics, Instant::now());
        }

        assert_eq!(engine.store_mut().load(&path, true).unwrap(), 1);
        let store = engine.store();
        assert!(!store.get(0).unwrap().patch().unwrap().rumble_state().is_warming_up());
        assert!(store.get(1).unwrap().patch().unwrap().rumble_state().is_warming_up());
    }

    #[test]
    fn test_toggle_restarts_warmup() {
        let mut engine = CheatEngine::new(EngineConfig::default());
        engine.store_mut().push(watcher());
        let mut memory = MockMemoryBuilder::new().with_size(1).build();
        for _ in 0..WARMUP_EVALUATIONS {
            engine.run_frame(&mut memory, &mut NoHaptics, Instant::now());
        }
        let state: &RumbleState = engine.store().get(0).unwrap().patch().unwrap().rumble_state();
        assert!(!state.is_warming_up());

        engine.store_mut().toggle(0).unwrap();
        engine.store_mut().toggle(0).unwrap();
        let state = engine.store().get(0).unwrap().patch().unwrap().rumble_state();
        assert!(state.is_warming_up());
    }
}
