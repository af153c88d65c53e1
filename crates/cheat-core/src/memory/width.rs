//! Bit-width codec.
//!
//! Maps a configured item width to its byte/bit layout and packs or unpacks
//! items in a memory buffer. Items of 8 bits or more are assembled from
//! `bytes_per_item` consecutive bytes in the configured byte order; narrower
//! items live inside a single byte at a bit offset.
//!
//! All accessors are bounds-checked and return `None` instead of touching
//! bytes outside the buffer.

use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

/// Bit width used to interpret each memory item (the "memory search size").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum WidthClass {
    #[strum(serialize = "1-bit")]
    #[serde(rename = "1bit")]
    Bits1 = 0,
    #[strum(serialize = "2-bit")]
    #[serde(rename = "2bit")]
    Bits2 = 1,
    #[strum(serialize = "4-bit")]
    #[serde(rename = "4bit")]
    Bits4 = 2,
    #[default]
    #[strum(serialize = "8-bit")]
    #[serde(rename = "8bit")]
    Bits8 = 3,
    #[strum(serialize = "16-bit")]
    #[serde(rename = "16bit")]
    Bits16 = 4,
    #[strum(serialize = "32-bit")]
    #[serde(rename = "32bit")]
    Bits32 = 5,
}

/// Byte and bit layout of one item at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemLayout {
    pub bytes_per_item: usize,
    pub bits_per_item: u32,
    pub mask: u32,
}

impl WidthClass {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Width class for an item size given in bits (1, 2, 4, 8, 16 or 32).
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            1 => Some(WidthClass::Bits1),
            2 => Some(WidthClass::Bits2),
            4 => Some(WidthClass::Bits4),
            8 => Some(WidthClass::Bits8),
            16 => Some(WidthClass::Bits16),
            32 => Some(WidthClass::Bits32),
            _ => None,
        }
    }

    pub const fn layout(self) -> ItemLayout {
        match self {
            WidthClass::Bits1 => ItemLayout {
                bytes_per_item: 1,
                bits_per_item: 1,
                mask: 0x1,
            },
            WidthClass::Bits2 => ItemLayout {
                bytes_per_item: 1,
                bits_per_item: 2,
                mask: 0x3,
            },
            WidthClass::Bits4 => ItemLayout {
                bytes_per_item: 1,
                bits_per_item: 4,
                mask: 0xF,
            },
            WidthClass::Bits8 => ItemLayout {
                bytes_per_item: 1,
                bits_per_item: 8,
                mask: 0xFF,
            },
            WidthClass::Bits16 => ItemLayout {
                bytes_per_item: 2,
                bits_per_item: 8,
                mask: 0xFFFF,
            },
            WidthClass::Bits32 => ItemLayout {
                bytes_per_item: 4,
                bits_per_item: 8,
                mask: 0xFFFF_FFFF,
            },
        }
    }

    /// True for the 1/2/4-bit classes that pack several items per byte.
    pub const fn is_sub_byte(self) -> bool {
        (self as u8) < (WidthClass::Bits8 as u8)
    }

    /// Number of items of this width in `total_size` bytes.
    pub const fn item_count(self, total_size: usize) -> usize {
        total_size * 8 / (1usize << self as u8)
    }
}

impl std::fmt::Display for WidthClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of an item in a buffer. `bit_offset` is only meaningful for
/// sub-byte widths and is 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemAddress {
    pub byte_offset: usize,
    pub bit_offset: u32,
}

impl ItemAddress {
    pub fn new(byte_offset: usize, bit_offset: u32) -> Self {
        Self {
            byte_offset,
            bit_offset,
        }
    }

    /// Resolve a cheat's `address` + `address_bit_mask` pair. For sub-byte
    /// widths the bit offset is the lowest set bit of the mask.
    pub fn from_cheat(address: u32, address_bit_mask: u32, width: WidthClass) -> Self {
        let bit_offset = if width.is_sub_byte() {
            sub_bit_offset(address_bit_mask)
        } else {
            0
        };
        Self::new(address as usize, bit_offset)
    }

    /// Advance by `items` items of `width`, carrying sub-byte positions
    /// into following bytes.
    pub fn advance(self, items: u32, width: WidthClass) -> Option<Self> {
        let layout = width.layout();
        if width.is_sub_byte() {
            let bits = u64::from(self.bit_offset) + u64::from(items) * u64::from(layout.bits_per_item);
            let byte_offset = self.byte_offset.checked_add((bits / 8) as usize)?;
            Some(Self::new(byte_offset, (bits % 8) as u32))
        } else {
            let delta = (items as usize).checked_mul(layout.bytes_per_item)?;
            Some(Self::new(self.byte_offset.checked_add(delta)?, 0))
        }
    }

    /// Mask describing this item's bits within its byte (0xFF for whole-byte items).
    pub fn bit_mask(&self, width: WidthClass) -> u32 {
        if width.is_sub_byte() {
            width.layout().mask << self.bit_offset
        } else {
            0xFF
        }
    }
}

/// Bit offset selected by a sub-byte address mask (its lowest set bit).
pub fn sub_bit_offset(address_bit_mask: u32) -> u32 {
    let mask = address_bit_mask & 0xFF;
    if mask == 0 { 0 } else { mask.trailing_zeros() }
}

/// Assemble `bytes_per_item` bytes starting at `offset`.
pub fn read(buf: &[u8], offset: usize, bytes_per_item: usize, big_endian: bool) -> Option<u32> {
    let end = offset.checked_add(bytes_per_item)?;
    let bytes = buf.get(offset..end)?;
    let fold = |acc: u32, b: &u8| (acc << 8) | u32::from(*b);
    Some(if big_endian {
        bytes.iter().fold(0, fold)
    } else {
        bytes.iter().rev().fold(0, fold)
    })
}

/// Inverse of [`read`]. Never touches bytes outside `offset..offset + bytes_per_item`.
pub fn write(
    buf: &mut [u8],
    offset: usize,
    bytes_per_item: usize,
    big_endian: bool,
    value: u32,
) -> Option<()> {
    let end = offset.checked_add(bytes_per_item)?;
    let bytes = buf.get_mut(offset..end)?;
    for (i, byte) in bytes.iter_mut().enumerate() {
        let shift = if big_endian {
            (bytes_per_item - 1 - i) * 8
        } else {
            i * 8
        };
        *byte = (value >> shift) as u8;
    }
    Some(())
}

pub fn read_subitem(byte: u8, bit_offset: u32, mask: u32) -> u32 {
    (u32::from(byte) >> bit_offset) & mask
}

/// Replace the `mask`-wide field at `bit_offset`, keeping every other bit of `byte`.
pub fn write_subitem(byte: u8, bit_offset: u32, mask: u32, value: u32) -> u8 {
    let field = (mask << bit_offset) & 0xFF;
    let bits = ((value & mask) << bit_offset) & 0xFF;
    ((u32::from(byte) & !field) | bits) as u8
}

/// Read one item of `width` at `addr`.
pub fn read_item(buf: &[u8], addr: ItemAddress, width: WidthClass, big_endian: bool) -> Option<u32> {
    let layout = width.layout();
    if width.is_sub_byte() {
        let byte = *buf.get(addr.byte_offset)?;
        Some(read_subitem(byte, addr.bit_offset, layout.mask))
    } else {
        read(buf, addr.byte_offset, layout.bytes_per_item, big_endian)
    }
}

/// Write one item of `width` at `addr`, truncating `value` to the item's mask.
pub fn write_item(
    buf: &mut [u8],
    addr: ItemAddress,
    width: WidthClass,
    big_endian: bool,
    value: u32,
) -> Option<()> {
    let layout = width.layout();
    if width.is_sub_byte() {
        let byte = buf.get_mut(addr.byte_offset)?;
        *byte = write_subitem(*byte, addr.bit_offset, layout.mask, value);
        Some(())
    } else {
        write(
            buf,
            addr.byte_offset,
            layout.bytes_per_item,
            big_endian,
            value & layout.mask,
        )
    }
}
