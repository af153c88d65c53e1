//! Cheat list, persistence and per-frame application.

mod code;
pub mod format;
pub mod interpreter;
mod persist;
pub mod rumble;
mod store;

pub use code::*;
pub use interpreter::{FrameStats, apply_frame};
pub use persist::{read_cheats, write_cheats};
pub use rumble::RumbleState;
pub use store::CheatStore;
