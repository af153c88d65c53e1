pub mod cheat;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod memory;
pub mod search;

pub use cheat::{
    CheatCode, CheatKind, CheatOp, CheatStore, FrameStats, Handler, MemoryPatch, Repeat,
    RumbleConfig, RumbleKind, apply_frame,
};
pub use config::EngineConfig;
pub use engine::CheatEngine;
pub use error::{Error, Result};
pub use host::{
    CoreCheats, CoreMemory, Haptics, LogNotifier, NoCoreCheats, NoHaptics, Notifier, RegionId,
    RumbleChannel,
};
pub use memory::{MemorySession, WidthClass};
pub use search::{MatchAction, MatchSet, MatchView, Search, SearchQuery};
