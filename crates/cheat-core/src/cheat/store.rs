use tracing::{debug, info};

use crate::config::limits::MAX_PROMOTED_CHEATS;
use crate::error::{Error, Result};
use crate::search::{MatchAction, MatchView, Search};

use super::code::{CheatCode, CheatKind, Handler, MemoryPatch};

/// Ordered cheat list plus the editor's working copy.
///
/// Every entry's `index` equals its position; structural changes renumber.
#[derive(Debug, Clone)]
pub struct CheatStore {
    cheats: Vec<CheatCode>,
    working: CheatCode,
}

impl Default for CheatStore {
    fn default() -> Self {
        Self {
            cheats: Vec::new(),
            working: CheatCode::blank(0, Handler::EngineApplied),
        }
    }
}

impl CheatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cheats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cheats.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CheatCode> {
        self.cheats.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheatCode> {
        self.cheats.iter()
    }

    pub fn as_slice(&self) -> &[CheatCode] {
        &self.cheats
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [CheatCode] {
        &mut self.cheats
    }

    pub fn enabled_count(&self) -> usize {
        self.cheats.iter().filter(|c| c.enabled).count()
    }

    /// Append one entry. Not capacity-checked.
    pub fn push(&mut self, mut code: CheatCode) -> usize {
        let index = self.cheats.len();
        code.index = index as u32;
        self.cheats.push(code);
        index
    }

    /// Insert one entry at `index` (== len appends). Not capacity-checked.
    pub fn insert(&mut self, index: usize, code: CheatCode) -> Result<()> {
        if index > self.cheats.len() {
            return Err(self.out_of_range(index));
        }
        self.cheats.insert(index, code);
        self.renumber();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<CheatCode> {
        if index >= self.cheats.len() {
            return Err(self.out_of_range(index));
        }
        let removed = self.cheats.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Swap the entry with its predecessor. Returns its new index.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        if index >= self.cheats.len() {
            return Err(self.out_of_range(index));
        }
        if index == 0 {
            return Ok(0);
        }
        self.cheats.swap(index - 1, index);
        self.renumber();
        Ok(index - 1)
    }

    /// Swap the entry with its successor. Returns its new index.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        if index >= self.cheats.len() {
            return Err(self.out_of_range(index));
        }
        if index + 1 == self.cheats.len() {
            return Ok(index);
        }
        self.cheats.swap(index, index + 1);
        self.renumber();
        Ok(index + 1)
    }

    /// Delete every entry.
    pub fn clear(&mut self) {
        info!("Cleared {} cheats", self.cheats.len());
        self.cheats.clear();
    }

    /// Grow with blank `handler` entries or truncate to `new_len`.
    ///
    /// Truncation drops the tail entries (and their strings) for good.
    pub fn realloc(&mut self, new_len: usize, handler: Handler) {
        let old_len = self.cheats.len();
        if new_len < old_len {
            self.cheats.truncate(new_len);
        } else {
            self.cheats
                .extend((old_len..new_len).map(|i| CheatCode::blank(i as u32, handler)));
        }
        debug!("Cheat list resized {} -> {}", old_len, new_len);
    }

    /// Flip one entry's enabled flag. Enabling restarts its rumble warm-up.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.cheats.len();
        let cheat = self
            .cheats
            .get_mut(index)
            .ok_or(Error::CheatIndexOutOfRange { index, len })?;
        cheat.enabled = !cheat.enabled;
        if cheat.enabled
            && let Some(patch) = cheat.patch_mut()
        {
            patch.reset_runtime();
        }
        Ok(cheat.enabled)
    }

    /// Copy entry `index` into the working copy for editing.
    pub fn stage(&mut self, index: usize) -> Result<&mut CheatCode> {
        let cheat = self
            .get(index)
            .cloned()
            .ok_or_else(|| self.out_of_range(index))?;
        self.working = cheat;
        Ok(&mut self.working)
    }

    pub fn working(&self) -> &CheatCode {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut CheatCode {
        &mut self.working
    }

    /// Write the working copy back over entry `index`.
    pub fn commit(&mut self, index: usize) -> Result<()> {
        let len = self.cheats.len();
        let slot = self
            .cheats
            .get_mut(index)
            .ok_or(Error::CheatIndexOutOfRange { index, len })?;
        *slot = self.working.clone();
        slot.index = index as u32;
        if let Some(patch) = slot.patch_mut() {
            patch.reset_runtime();
        }
        Ok(())
    }

    /// Promote every alive match to a `Set` cheat at its current value.
    ///
    /// All or nothing: if the result would exceed the cheat limit the store
    /// is left unchanged.
    pub fn add_matches(&mut self, search: &Search, current: &[u8]) -> Result<usize> {
        let matches = search.num_matches();
        if matches + self.cheats.len() > MAX_PROMOTED_CHEATS {
            return Err(Error::TooManyMatches {
                matches,
                existing: self.cheats.len(),
                limit: MAX_PROMOTED_CHEATS,
            });
        }

        let (width, big_endian) = (search.width(), search.big_endian());
        for view in search.views(current) {
            self.push(CheatCode::engine_applied(MemoryPatch::from_match(
                &view, width, big_endian,
            )));
        }
        info!("Added {} matches to the cheat list", matches);
        Ok(matches)
    }

    /// View, copy or delete the match with encounter index `index`.
    pub fn match_action(
        &mut self,
        search: &mut Search,
        current: &[u8],
        action: MatchAction,
        index: usize,
    ) -> Result<MatchView> {
        match action {
            MatchAction::View => search.view(current, index),
            MatchAction::Copy => {
                let view = search.view(current, index)?;
                self.push(CheatCode::engine_applied(MemoryPatch::from_match(
                    &view,
                    search.width(),
                    search.big_endian(),
                )));
                Ok(view)
            }
            MatchAction::Delete => search.delete(current, index),
        }
    }

    /// Restart runtime state (rumble warm-up) of the engine-applied entries
    /// from `start` on.
    pub(crate) fn reset_runtime_from(&mut self, start: usize) {
        for cheat in self.cheats.iter_mut().skip(start) {
            if let Some(patch) = cheat.patch_mut() {
                patch.reset_runtime();
            }
        }
    }

    /// Enabled, non-empty core-opaque codes in list order.
    pub fn core_codes(&self) -> impl Iterator<Item = &str> {
        self.cheats.iter().filter(|c| c.enabled).filter_map(|c| match &c.kind {
            CheatKind::CoreOpaque { code } if !code.is_empty() => Some(code.as_str()),
            _ => None,
        })
    }

    pub(crate) fn extend(&mut self, cheats: impl IntoIterator<Item = CheatCode>) {
        self.cheats.extend(cheats);
        self.renumber();
    }

    pub(crate) fn replace(&mut self, cheats: Vec<CheatCode>) {
        self.cheats = cheats;
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, cheat) in self.cheats.iter_mut().enumerate() {
            cheat.index = i as u32;
        }
    }

    fn out_of_range(&self, index: usize) -> Error {
        Error::CheatIndexOutOfRange {
            index,
            len: self.cheats.len(),
        }
    }
}
