//! Memory session: the frame-to-frame snapshot a search compares against.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::host::{CoreMemory, RegionId};
use crate::memory::{ItemLayout, WidthClass};

/// Snapshot of one core memory region taken when a search begins.
///
/// `previous` always has the size the region had at `begin`; every later
/// access to the live region is checked against it. The live region itself
/// is borrowed from the core on each call and never retained.
#[derive(Debug, Clone)]
pub struct MemorySession {
    region: RegionId,
    previous: Vec<u8>,
    width: WidthClass,
    big_endian: bool,
}

impl MemorySession {
    /// Snapshot `region` of the core's memory.
    ///
    /// Fails without allocating if the core exposes no such region or an
    /// empty one.
    pub fn begin<M: CoreMemory + ?Sized>(
        memory: &M,
        region: RegionId,
        width: WidthClass,
        big_endian: bool,
    ) -> Result<Self> {
        let current = memory.region(region).ok_or_else(|| {
            Error::MemoryUnavailable(format!("core exposes no {:?} region", region))
        })?;
        if current.is_empty() {
            return Err(Error::MemoryUnavailable(format!(
                "{:?} region is empty",
                region
            )));
        }

        info!(
            "Search session started: {} bytes of {:?} at {}{}",
            current.len(),
            region,
            width,
            if big_endian { " (big endian)" } else { "" }
        );

        Ok(Self {
            region,
            previous: current.to_vec(),
            width,
            big_endian,
        })
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn total_size(&self) -> usize {
        self.previous.len()
    }

    pub fn width(&self) -> WidthClass {
        self.width
    }

    pub fn layout(&self) -> ItemLayout {
        self.width.layout()
    }

    pub fn big_endian(&self) -> bool {
        self.big_endian
    }

    /// Snapshot taken at the end of the previous search step.
    pub fn previous(&self) -> &[u8] {
        &self.previous
    }

    /// Borrow the live region, checking it still has the session's size.
    pub fn current<'m, M: CoreMemory + ?Sized>(&self, memory: &'m M) -> Result<&'m [u8]> {
        let current = memory.region(self.region).ok_or_else(|| {
            Error::MemoryUnavailable(format!("core no longer exposes {:?}", self.region))
        })?;
        self.check_size(current.len())?;
        Ok(current)
    }

    /// Make `current` the baseline for the next comparison.
    pub fn advance(&mut self, current: &[u8]) -> Result<()> {
        self.check_size(current.len())?;
        self.previous.copy_from_slice(current);
        debug!("Search baseline advanced ({} bytes)", current.len());
        Ok(())
    }

    fn check_size(&self, actual: usize) -> Result<()> {
        if actual != self.previous.len() {
            return Err(Error::RegionSizeChanged {
                expected: self.previous.len(),
                actual,
            });
        }
        Ok(())
    }
}
