//! Packed bitmap of candidate matches.

use crate::memory::{ItemAddress, WidthClass};

/// One still-alive candidate, in address order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLocation {
    /// Encounter index: position among alive items when walking in address order.
    pub index: usize,
    pub addr: ItemAddress,
}

/// Candidate set of a search session.
///
/// Holds one mask byte per `bytes_per_item` chunk of the scanned region.
/// Whole-byte widths use the byte as a single flag; sub-byte widths keep one
/// independently killable bit group per item inside the byte.
#[derive(Debug, Clone)]
pub struct MatchSet {
    mask: Vec<u8>,
    width: WidthClass,
    num_matches: usize,
}

impl MatchSet {
    /// Mark every item of a `total_size`-byte region alive.
    pub fn all_alive(total_size: usize, width: WidthClass) -> Self {
        let chunks = total_size / width.layout().bytes_per_item;
        Self {
            mask: vec![0xFF; chunks],
            width,
            num_matches: width.item_count(total_size),
        }
    }

    pub fn num_matches(&self) -> usize {
        self.num_matches
    }

    pub fn width(&self) -> WidthClass {
        self.width
    }

    pub fn is_alive(&self, addr: ItemAddress) -> bool {
        let Some(chunk) = self.chunk_of(addr.byte_offset) else {
            return false;
        };
        let m = self.mask[chunk];
        if self.width.is_sub_byte() {
            (u32::from(m) >> addr.bit_offset) & self.width.layout().mask != 0
        } else {
            m != 0
        }
    }

    /// Walk alive items in address order. Each call re-walks the whole mask.
    pub fn iter_alive(&self) -> AliveIter<'_> {
        AliveIter {
            set: self,
            chunk: 0,
            bit: 0,
            encountered: 0,
        }
    }

    /// Find the alive item with the given encounter index.
    pub fn nth_alive(&self, index: usize) -> Option<MatchLocation> {
        self.iter_alive().nth(index)
    }

    /// Eliminate one candidate. `None` for the bit offset kills every item in
    /// the chunk. A sub-byte bit offset must sit on an item boundary. Returns
    /// true if anything alive was removed.
    pub fn kill(&mut self, byte_offset: usize, bit_offset: Option<u32>) -> bool {
        let Some(chunk) = self.chunk_of(byte_offset) else {
            return false;
        };
        let before = self.alive_in_chunk(chunk);
        match bit_offset {
            Some(bit) if self.width.is_sub_byte() => {
                let layout = self.width.layout();
                if bit >= 8 || bit % layout.bits_per_item != 0 {
                    return false;
                }
                let field = (layout.mask << bit) & 0xFF;
                self.mask[chunk] &= !(field as u8);
            }
            _ => self.mask[chunk] = 0,
        }
        let removed = before - self.alive_in_chunk(chunk);
        self.num_matches = self.num_matches.saturating_sub(removed);
        removed > 0
    }

    /// Kill every alive item for which `keep` returns false. Returns the new
    /// match count.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(ItemAddress) -> bool) -> usize {
        let layout = self.width.layout();
        for chunk in 0..self.mask.len() {
            if self.mask[chunk] == 0 {
                continue;
            }
            let byte_offset = chunk * layout.bytes_per_item;
            if self.width.is_sub_byte() {
                for bit in (0..8u32).step_by(layout.bits_per_item as usize) {
                    let field = (layout.mask << bit) as u8;
                    if self.mask[chunk] & field != 0 && !keep(ItemAddress::new(byte_offset, bit)) {
                        self.mask[chunk] &= !field;
                        self.num_matches = self.num_matches.saturating_sub(1);
                    }
                }
            } else if !keep(ItemAddress::new(byte_offset, 0)) {
                self.mask[chunk] = 0;
                self.num_matches = self.num_matches.saturating_sub(1);
            }
        }
        self.num_matches
    }

    fn chunk_of(&self, byte_offset: usize) -> Option<usize> {
        let bytes = self.width.layout().bytes_per_item;
        if byte_offset % bytes != 0 {
            return None;
        }
        let chunk = byte_offset / bytes;
        (chunk < self.mask.len()).then_some(chunk)
    }

    fn alive_in_chunk(&self, chunk: usize) -> usize {
        let m = self.mask[chunk];
        if !self.width.is_sub_byte() {
            return usize::from(m != 0);
        }
        let layout = self.width.layout();
        (0..8u32)
            .step_by(layout.bits_per_item as usize)
            .filter(|bit| (u32::from(m) >> bit) & layout.mask != 0)
            .count()
    }
}

/// Lazy walk over alive items, see [`MatchSet::iter_alive`].
pub struct AliveIter<'a> {
    set: &'a MatchSet,
    chunk: usize,
    bit: u32,
    encountered: usize,
}

impl Iterator for AliveIter<'_> {
    type Item = MatchLocation;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.set.width;
        let layout = width.layout();
        while self.chunk < self.set.mask.len() {
            let m = u32::from(self.set.mask[self.chunk]);
            let byte_offset = self.chunk * layout.bytes_per_item;

            if width.is_sub_byte() {
                while self.bit < 8 {
                    let bit = self.bit;
                    self.bit += layout.bits_per_item;
                    if (m >> bit) & layout.mask != 0 {
                        return Some(self.emit(ItemAddress::new(byte_offset, bit)));
                    }
                }
                self.bit = 0;
                self.chunk += 1;
            } else {
                self.chunk += 1;
                if m != 0 {
                    return Some(self.emit(ItemAddress::new(byte_offset, 0)));
                }
            }
        }
        None
    }
}

impl AliveIter<'_> {
    fn emit(&mut self, addr: ItemAddress) -> MatchLocation {
        let location = MatchLocation {
            index: self.encountered,
            addr,
        };
        self.encountered += 1;
        location
    }
}
