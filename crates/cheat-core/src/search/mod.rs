//! Live memory search.
//!
//! A search starts by snapshotting a core memory region with every item
//! alive, then narrows the candidates one query at a time. After each query
//! the snapshot advances to the frame just scanned, so relative queries
//! (`Gt`, `Lt`, ...) always compare against the previous step rather than the
//! original baseline.

mod matches;
mod query;

pub use matches::{AliveIter, MatchLocation, MatchSet};
pub use query::{SearchQuery, parse_value};

use serde::Serialize;
use strum::IntoStaticStr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::host::{CoreMemory, RegionId};
use crate::memory::{MemorySession, WidthClass, read_item};

/// Narrow `matches` to the items satisfying `query`, then advance the
/// session baseline to `current`. Returns the remaining match count.
pub fn run(
    session: &mut MemorySession,
    matches: &mut MatchSet,
    current: &[u8],
    query: SearchQuery,
) -> Result<usize> {
    if current.len() != session.total_size() {
        return Err(Error::RegionSizeChanged {
            expected: session.total_size(),
            actual: current.len(),
        });
    }

    let width = session.width();
    let big_endian = session.big_endian();
    let previous = session.previous();
    let before = matches.num_matches();

    let remaining = matches.retain(|addr| {
        match (
            read_item(current, addr, width, big_endian),
            read_item(previous, addr, width, big_endian),
        ) {
            (Some(curr), Some(prev)) => query.matches(curr, prev),
            _ => false,
        }
    });

    session.advance(current)?;
    debug!("Search {}: {} -> {} matches", query, before, remaining);
    Ok(remaining)
}

/// Snapshot of one candidate, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchView {
    pub index: usize,
    pub address: u32,
    pub address_bit_mask: u32,
    pub previous: u32,
    pub current: u32,
}

/// What to do with a single match picked by encounter index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum MatchAction {
    /// Report address and values without changing anything.
    View,
    /// Append the match to the cheat list as a `Set` patch.
    Copy,
    /// Drop the match from the candidate set.
    Delete,
}

/// An active search: snapshot plus candidate set.
#[derive(Debug, Clone)]
pub struct Search {
    session: MemorySession,
    matches: MatchSet,
}

impl Search {
    /// Snapshot `region` and mark every item alive.
    pub fn begin<M: CoreMemory + ?Sized>(
        memory: &M,
        region: RegionId,
        width: WidthClass,
        big_endian: bool,
    ) -> Result<Self> {
        let session = MemorySession::begin(memory, region, width, big_endian)?;
        let matches = MatchSet::all_alive(session.total_size(), width);
        Ok(Self { session, matches })
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    pub fn num_matches(&self) -> usize {
        self.matches.num_matches()
    }

    pub fn width(&self) -> WidthClass {
        self.session.width()
    }

    pub fn big_endian(&self) -> bool {
        self.session.big_endian()
    }

    /// Borrow the live region checked against the session size.
    pub fn current<'m, M: CoreMemory + ?Sized>(&self, memory: &'m M) -> Result<&'m [u8]> {
        self.session.current(memory)
    }

    pub fn run<M: CoreMemory + ?Sized>(&mut self, memory: &M, query: SearchQuery) -> Result<usize> {
        let current = self.session.current(memory)?;
        run(&mut self.session, &mut self.matches, current, query)
    }

    /// Views of every alive match against `current`, in address order.
    pub fn views<'a>(&'a self, current: &'a [u8]) -> impl Iterator<Item = MatchView> + 'a {
        self.matches
            .iter_alive()
            .map(move |location| self.view_of(location, current))
    }

    /// View the match with the given encounter index.
    pub fn view(&self, current: &[u8], index: usize) -> Result<MatchView> {
        let location = self.locate(index)?;
        Ok(self.view_of(location, current))
    }

    /// Remove the match with the given encounter index.
    pub fn delete(&mut self, current: &[u8], index: usize) -> Result<MatchView> {
        let location = self.locate(index)?;
        let view = self.view_of(location, current);
        let bit_offset = self
            .width()
            .is_sub_byte()
            .then_some(location.addr.bit_offset);
        self.matches.kill(location.addr.byte_offset, bit_offset);
        Ok(view)
    }

    fn locate(&self, index: usize) -> Result<MatchLocation> {
        self.matches
            .nth_alive(index)
            .ok_or(Error::MatchIndexOutOfRange {
                index,
                count: self.matches.num_matches(),
            })
    }

    fn view_of(&self, location: MatchLocation, current: &[u8]) -> MatchView {
        let width = self.width();
        let big_endian = self.big_endian();
        let addr = location.addr;
        MatchView {
            index: location.index,
            address: addr.byte_offset as u32,
            address_bit_mask: addr.bit_mask(width),
            previous: read_item(self.session.previous(), addr, width, big_endian).unwrap_or(0),
            current: read_item(current, addr, width, big_endian).unwrap_or(0),
        }
    }
}
