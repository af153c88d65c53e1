//! Mock core for testing
//!
//! Provides in-memory implementations of the host traits so that search,
//! interpreter and engine logic can be verified without a running core.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::host::{CoreCheats, CoreMemory, Haptics, Notifier, RegionId, RumbleChannel};

/// Mock core memory
///
/// Holds one buffer per exposed region. The builder writes into
/// `SystemRam`; other regions are added with [`MockMemoryBuilder::region`].
#[derive(Debug, Clone, Default)]
pub struct MockCoreMemory {
    regions: HashMap<RegionId, Vec<u8>>,
}

impl MockCoreMemory {
    /// Create a mock core exposing `data` as system RAM
    pub fn new(data: Vec<u8>) -> Self {
        let mut regions = HashMap::new();
        regions.insert(RegionId::SystemRam, data);
        Self { regions }
    }

    /// System RAM contents
    pub fn ram(&self) -> &[u8] {
        self.regions
            .get(&RegionId::SystemRam)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable system RAM, for simulating the core running a frame
    pub fn ram_mut(&mut self) -> &mut [u8] {
        self.regions
            .get_mut(&RegionId::SystemRam)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    /// Replace a region wholesale (e.g. to simulate a core reallocating)
    pub fn set_region(&mut self, id: RegionId, data: Vec<u8>) {
        self.regions.insert(id, data);
    }
}

impl CoreMemory for MockCoreMemory {
    fn region(&self, id: RegionId) -> Option<&[u8]> {
        self.regions.get(&id).map(Vec::as_slice)
    }

    fn region_mut(&mut self, id: RegionId) -> Option<&mut [u8]> {
        self.regions.get_mut(&id).map(Vec::as_mut_slice)
    }
}

/// Builder for creating test memory layouts
///
/// Provides a fluent API for constructing system RAM contents.
#[derive(Debug, Clone, Default)]
pub struct MockMemoryBuilder {
    data: Vec<u8>,
    extra: Vec<(RegionId, Vec<u8>)>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate system RAM with zeros up to the specified size
    pub fn with_size(mut self, size: usize) -> Self {
        self.data.resize(size, 0);
        self
    }

    /// Fill the whole buffer with one byte value
    pub fn fill(mut self, value: u8) -> Self {
        self.data.iter_mut().for_each(|b| *b = value);
        self
    }

    pub fn write_u8(mut self, offset: usize, value: u8) -> Self {
        self.ensure_size(offset + 1);
        self.data[offset] = value;
        self
    }

    pub fn write_u16_le(mut self, offset: usize, value: u16) -> Self {
        self.ensure_size(offset + 2);
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u16_be(mut self, offset: usize, value: u16) -> Self {
        self.ensure_size(offset + 2);
        self.data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        self
    }

    pub fn write_u32_le(mut self, offset: usize, value: u32) -> Self {
        self.ensure_size(offset + 4);
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32_be(mut self, offset: usize, value: u32) -> Self {
        self.ensure_size(offset + 4);
        self.data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        self
    }

    /// Write raw bytes at the specified offset
    pub fn write_bytes(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.ensure_size(offset + bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Expose an additional region besides system RAM
    pub fn region(mut self, id: RegionId, data: Vec<u8>) -> Self {
        self.extra.push((id, data));
        self
    }

    pub fn build(self) -> MockCoreMemory {
        let mut memory = MockCoreMemory::new(self.data);
        for (id, data) in self.extra {
            memory.set_region(id, data);
        }
        memory
    }

    fn ensure_size(&mut self, required: usize) {
        if self.data.len() < required {
            self.data.resize(required, 0);
        }
    }
}

/// Haptics sink that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    pub events: Vec<(u32, RumbleChannel, u16)>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events sent to one channel, in order
    pub fn channel(&self, channel: RumbleChannel) -> Vec<u16> {
        self.events
            .iter()
            .filter(|(_, c, _)| *c == channel)
            .map(|(_, _, strength)| *strength)
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Haptics for RecordingHaptics {
    fn set_rumble(&mut self, port: u32, channel: RumbleChannel, strength: u16) {
        self.events.push((port, channel, strength));
    }
}

/// Notifier that keeps every message. Clones share one log, so a test can
/// hand one clone to the engine and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn push(&mut self, message: &str, _priority: u32, _duration_frames: u32) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// Core cheat subsystem that records the codes it was given
#[derive(Debug, Clone, Default)]
pub struct RecordingCoreCheats {
    pub resets: usize,
    pub codes: Vec<(u32, bool, String)>,
}

impl CoreCheats for RecordingCoreCheats {
    fn cheat_reset(&mut self) {
        self.resets += 1;
        self.codes.clear();
    }

    fn cheat_set(&mut self, index: u32, enabled: bool, code: &str) {
        self.codes.push((index, enabled, code.to_string()));
    }
}
