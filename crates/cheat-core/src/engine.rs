//! Cheat engine: search session, cheat list and frame hook in one value.
//!
//! The host constructs one `CheatEngine`, calls [`CheatEngine::run_frame`]
//! from its per-frame update and forwards user actions (search steps, match
//! actions, load/save, toggles) to the other methods. Failures are pushed to
//! the notifier and returned; none of them leave earlier state half-changed.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::cheat::{CheatStore, FrameStats, apply_frame};
use crate::config::EngineConfig;
use crate::config::notify::{DEFAULT_DURATION_FRAMES, DEFAULT_PRIORITY};
use crate::error::{Error, Result};
use crate::host::{CoreCheats, CoreMemory, Haptics, LogNotifier, Notifier};
use crate::search::{MatchAction, MatchView, Search, SearchQuery};

pub struct CheatEngine {
    config: EngineConfig,
    store: CheatStore,
    search: Option<Search>,
    notifier: Box<dyn Notifier>,
}

impl CheatEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_notifier(config, LogNotifier)
    }

    pub fn with_notifier(config: EngineConfig, notifier: impl Notifier + 'static) -> Self {
        Self {
            config,
            store: CheatStore::new(),
            search: None,
            notifier: Box::new(notifier),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Settings changes apply to the next search session, not a running one.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn store(&self) -> &CheatStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CheatStore {
        &mut self.store
    }

    pub fn search(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    /// Start a new search session, discarding any previous one.
    pub fn begin_search<M: CoreMemory + ?Sized>(&mut self, memory: &M) -> Result<usize> {
        self.search = None;
        let search = Search::begin(
            memory,
            self.config.region,
            self.config.search_width,
            self.config.search_big_endian,
        );
        let search = self.report(search)?;
        let count = search.num_matches();
        self.search = Some(search);
        self.notify(&format!("Cheat search started: {} matches", count));
        Ok(count)
    }

    /// Tear down the search session. The core's memory is not touched.
    pub fn end_search(&mut self) {
        if self.search.take().is_some() {
            info!("Search session ended");
        }
    }

    /// Run one narrowing step.
    pub fn search_step<M: CoreMemory + ?Sized>(
        &mut self,
        memory: &M,
        query: SearchQuery,
    ) -> Result<usize> {
        let result = match self.search.as_mut() {
            Some(search) => search.run(memory, query),
            None => Err(Error::SearchNotInitialized),
        };
        let count = self.report(result)?;
        self.notify(&format!("Search {}: {} matches", query, count));
        Ok(count)
    }

    /// Promote every remaining match to a cheat (all or nothing).
    pub fn add_matches<M: CoreMemory + ?Sized>(&mut self, memory: &M) -> Result<usize> {
        let result = match self.search.as_ref() {
            Some(search) => search
                .current(memory)
                .and_then(|current| self.store.add_matches(search, current)),
            None => Err(Error::SearchNotInitialized),
        };
        let added = self.report(result)?;
        self.notify(&format!("Added {} matches to the cheat list", added));
        Ok(added)
    }

    /// View, copy or delete one match by encounter index.
    pub fn match_action<M: CoreMemory + ?Sized>(
        &mut self,
        memory: &M,
        action: MatchAction,
        index: usize,
    ) -> Result<MatchView> {
        let result = match self.search.as_mut() {
            Some(search) => match search.current(memory) {
                Ok(current) => self.store.match_action(search, current, action, index),
                Err(e) => Err(e),
            },
            None => Err(Error::SearchNotInitialized),
        };
        self.report(result)
    }

    /// Apply engine cheats to the core's memory. Called once per frame.
    pub fn run_frame<M: CoreMemory + ?Sized, H: Haptics + ?Sized>(
        &mut self,
        memory: &mut M,
        haptics: &mut H,
        now: Instant,
    ) -> FrameStats {
        let Some(region) = memory.region_mut(self.config.region) else {
            debug!("No {:?} region this frame, cheats not applied", self.config.region);
            return FrameStats::default();
        };
        apply_frame(self.store.as_mut_slice(), region, haptics, now)
    }

    /// Hand every enabled core-opaque code to the core's cheat subsystem.
    pub fn apply_core_cheats<C: CoreCheats + ?Sized>(&mut self, core: &mut C) -> usize {
        core.cheat_reset();
        let mut applied = 0u32;
        for code in self.store.core_codes() {
            core.cheat_set(applied, true, code);
            applied += 1;
        }
        self.notify(&format!("Applied {} core cheats", applied));
        applied as usize
    }

    /// Flip a cheat on or off.
    pub fn toggle<C: CoreCheats + ?Sized>(&mut self, index: usize, core: &mut C) -> Result<bool> {
        let result = self.store.toggle(index);
        let enabled = self.report(result)?;
        let label = self
            .store
            .get(index)
            .map(|c| c.label().to_string())
            .unwrap_or_default();
        self.notify(&format!(
            "Cheat #{} [{}]: {}",
            index,
            if enabled { "ON" } else { "OFF" },
            label
        ));
        if self.config.apply_after_toggle {
            self.apply_core_cheats(core);
        }
        Ok(enabled)
    }

    pub fn load<P: AsRef<Path>, C: CoreCheats + ?Sized>(
        &mut self,
        path: P,
        append: bool,
        core: &mut C,
    ) -> Result<usize> {
        let result = self.store.load(path, append);
        let count = self.report(result)?;
        self.notify(&format!("Loaded {} cheats", count));
        if self.config.apply_after_load {
            self.apply_core_cheats(core);
        }
        Ok(count)
    }

    pub fn save<P: AsRef<Path>>(&mut self, path: P, overwrite: bool) -> Result<()> {
        let result = self.store.save(path, overwrite);
        self.report(result)?;
        self.notify(&format!("Saved {} cheats", self.store.len()));
        Ok(())
    }

    /// Replace the list with the game-specific file, if any.
    pub fn load_game_specific<C: CoreCheats + ?Sized>(
        &mut self,
        core_name: &str,
        game_name: &str,
        core: &mut C,
    ) -> Result<usize> {
        let path = self.config.game_specific_path(core_name, game_name);
        self.load(path, false, core)
    }

    pub fn save_game_specific(&mut self, core_name: &str, game_name: &str) -> Result<()> {
        let path = self.config.game_specific_path(core_name, game_name);
        self.save(path, true)
    }

    fn notify(&mut self, message: &str) {
        self.notifier
            .push(message, DEFAULT_PRIORITY, DEFAULT_DURATION_FRAMES);
    }

    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.notify(&e.to_string());
        }
        result
    }
}
