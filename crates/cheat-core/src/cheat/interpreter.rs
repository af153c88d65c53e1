//! Per-frame cheat interpreter.
//!
//! Walks the enabled engine-applied cheats in list order and applies each to
//! the core's memory. A conditional (`RunNextIf*`) that evaluates false makes
//! the walk skip exactly the next enabled engine-applied cheat. A disabled
//! cheat still gets its running rumble pulse released.

use std::time::Instant;

use tracing::debug;

use crate::host::Haptics;
use crate::memory::{ItemAddress, read_item, write_item};

use super::code::{CheatCode, CheatOp, MemoryPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Execute,
    SkipOne,
}

/// Counters from one interpreter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub evaluated: usize,
    pub skipped: usize,
    pub writes: usize,
    pub out_of_range: usize,
}

/// Apply every enabled engine-applied cheat to `memory` once.
///
/// Core-opaque cheats are ignored here; they are handed to the core
/// separately. Cheats whose address falls outside `memory` are skipped
/// (an out-of-range conditional counts as false).
pub fn apply_frame<H: Haptics + ?Sized>(
    cheats: &mut [CheatCode],
    memory: &mut [u8],
    haptics: &mut H,
    now: Instant,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let mut gate = Gate::Execute;

    for cheat in cheats.iter_mut() {
        let (index, enabled) = (cheat.index, cheat.enabled);
        let Some(patch) = cheat.patch_mut() else {
            continue;
        };
        if !enabled {
            patch.rumble_state.release(patch.rumble.port, haptics);
            continue;
        }

        if gate == Gate::SkipOne {
            gate = Gate::Execute;
            stats.skipped += 1;
            continue;
        }

        let addr = ItemAddress::from_cheat(patch.address, patch.address_bit_mask, patch.width);
        let Some(curr) = read_item(memory, addr, patch.width, patch.big_endian) else {
            debug!(
                "Cheat #{} address {:#x} outside {} byte region",
                index,
                patch.address,
                memory.len()
            );
            stats.out_of_range += 1;
            if patch.op.is_conditional() {
                gate = Gate::SkipOne;
            }
            continue;
        };
        stats.evaluated += 1;

        patch
            .rumble_state
            .evaluate(&patch.rumble, curr, now, haptics);

        let condition = match patch.op {
            CheatOp::Disabled => continue,
            CheatOp::Set | CheatOp::Increase | CheatOp::Decrease => {
                let (writes, missed) = apply_writes(patch, addr, curr, memory);
                stats.writes += writes;
                stats.out_of_range += missed;
                continue;
            }
            CheatOp::RunNextIfEq => curr == patch.value,
            CheatOp::RunNextIfNeq => curr != patch.value,
            CheatOp::RunNextIfLt => curr < patch.value,
            CheatOp::RunNextIfGt => curr > patch.value,
        };
        if !condition {
            gate = Gate::SkipOne;
        }
    }

    stats
}

/// Perform a write op including its repeat expansion. Returns
/// (successful writes, out-of-range iterations).
fn apply_writes(
    patch: &MemoryPatch,
    start: ItemAddress,
    first_value: u32,
    memory: &mut [u8],
) -> (usize, usize) {
    let count = patch.repeat.count.max(1);

    if patch.repeat.add_to_address == 0 {
        // Every iteration lands on the same item
        let new_value = folded_value(patch, count, first_value);
        return match write_item(memory, start, patch.width, patch.big_endian, new_value) {
            Some(()) => (1, 0),
            None => (0, count as usize),
        };
    }

    let mut writes = 0;
    for i in 0..count {
        let operand = patch
            .value
            .wrapping_add(patch.repeat.add_to_value.wrapping_mul(i));
        let target = if i == 0 {
            Some(start)
        } else {
            patch
                .repeat
                .add_to_address
                .checked_mul(i)
                .and_then(|items| start.advance(items, patch.width))
        };
        let curr = target.and_then(|target| {
            if i == 0 {
                Some(first_value)
            } else {
                read_item(memory, target, patch.width, patch.big_endian)
            }
        });
        // Targets only move forward, so the rest of the walk is past the end too
        let (Some(target), Some(curr)) = (target, curr) else {
            return (writes, (count - i) as usize);
        };

        let new_value = combine(patch.op, curr, operand);
        if write_item(memory, target, patch.width, patch.big_endian, new_value).is_none() {
            return (writes, (count - i) as usize);
        }
        writes += 1;
    }

    (writes, 0)
}

fn combine(op: CheatOp, curr: u32, operand: u32) -> u32 {
    match op {
        CheatOp::Increase => curr.wrapping_add(operand),
        CheatOp::Decrease => curr.wrapping_sub(operand),
        _ => operand,
    }
}

/// Result of `count` iterations applied to one item, in closed form.
fn folded_value(patch: &MemoryPatch, count: u32, curr: u32) -> u32 {
    let step = patch.repeat.add_to_value;
    match patch.op {
        CheatOp::Increase | CheatOp::Decrease => {
            let pairs = u64::from(count) * u64::from(count - 1) / 2;
            let total = patch
                .value
                .wrapping_mul(count)
                .wrapping_add(step.wrapping_mul(pairs as u32));
            combine(patch.op, curr, total)
        }
        _ => patch.value.wrapping_add(step.wrapping_mul(count - 1)),
    }
}
