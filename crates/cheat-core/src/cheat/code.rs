use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};

use crate::memory::WidthClass;
use crate::search::MatchView;

use super::rumble::RumbleState;

/// Operation performed by an engine-applied cheat each frame.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum CheatOp {
    #[default]
    Disabled = 0,
    Set = 1,
    Increase = 2,
    Decrease = 3,
    RunNextIfEq = 4,
    RunNextIfNeq = 5,
    RunNextIfLt = 6,
    RunNextIfGt = 7,
}

impl CheatOp {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Conditional ops gate the next cheat instead of writing memory.
    pub fn is_conditional(&self) -> bool {
        matches!(
            self,
            CheatOp::RunNextIfEq | CheatOp::RunNextIfNeq | CheatOp::RunNextIfLt | CheatOp::RunNextIfGt
        )
    }
}

impl std::fmt::Display for CheatOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Condition under which a cheat fires its rumble pulse.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
)]
#[repr(u8)]
pub enum RumbleKind {
    #[default]
    Disabled = 0,
    Changes = 1,
    Unchanged = 2,
    Increase = 3,
    Decrease = 4,
    EqValue = 5,
    NeqValue = 6,
    LtValue = 7,
    GtValue = 8,
    IncreaseByValue = 9,
    DecreaseByValue = 10,
}

impl RumbleKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Whether the watched value's transition from `prev` to `curr` fires.
    pub fn triggered(&self, curr: u32, prev: u32, value: u32) -> bool {
        match self {
            RumbleKind::Disabled => false,
            RumbleKind::Changes => curr != prev,
            RumbleKind::Unchanged => curr == prev,
            RumbleKind::Increase => curr > prev,
            RumbleKind::Decrease => curr < prev,
            RumbleKind::EqValue => curr == value,
            RumbleKind::NeqValue => curr != value,
            RumbleKind::LtValue => curr < value,
            RumbleKind::GtValue => curr > value,
            RumbleKind::IncreaseByValue => curr == prev.wrapping_add(value),
            RumbleKind::DecreaseByValue => curr == prev.wrapping_sub(value),
        }
    }
}

/// Persistent rumble settings of one cheat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RumbleConfig {
    pub kind: RumbleKind,
    pub value: u32,
    pub port: u32,
    pub primary_strength: u16,
    pub primary_duration_ms: u32,
    pub secondary_strength: u16,
    pub secondary_duration_ms: u32,
}

/// Repeat expansion: apply a write `count` times over consecutive items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub count: u32,
    pub add_to_value: u32,
    pub add_to_address: u32,
}

impl Default for Repeat {
    fn default() -> Self {
        Self {
            count: 1,
            add_to_value: 0,
            add_to_address: 1,
        }
    }
}

/// Address/value driven cheat applied by the engine every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPatch {
    pub address: u32,
    /// Bits of the byte at `address` covered by a sub-byte item.
    pub address_bit_mask: u32,
    pub width: WidthClass,
    pub op: CheatOp,
    pub value: u32,
    pub big_endian: bool,
    pub repeat: Repeat,
    pub rumble: RumbleConfig,
    /// Runtime rumble tracking. Never persisted; struct literals normally
    /// take it from `..Default::default()`.
    #[serde(skip)]
    pub rumble_state: RumbleState,
}

impl Default for MemoryPatch {
    fn default() -> Self {
        Self {
            address: 0,
            address_bit_mask: 0xFF,
            width: WidthClass::Bits8,
            op: CheatOp::Set,
            value: 0,
            big_endian: false,
            repeat: Repeat::default(),
            rumble: RumbleConfig::default(),
            rumble_state: RumbleState::default(),
        }
    }
}

impl MemoryPatch {
    /// A `Set` patch pinning a search match to its current value.
    pub fn from_match(view: &MatchView, width: WidthClass, big_endian: bool) -> Self {
        Self {
            address: view.address,
            address_bit_mask: view.address_bit_mask,
            width,
            op: CheatOp::Set,
            value: view.current,
            big_endian,
            ..Default::default()
        }
    }

    /// Restart the rumble warm-up, e.g. after the cheat is re-enabled.
    /// A pulse still running is kept until it has been released.
    pub fn reset_runtime(&mut self) {
        self.rumble_state.restart();
    }

    pub fn rumble_state(&self) -> &RumbleState {
        &self.rumble_state
    }
}

/// How a cheat is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheatKind {
    /// Forwarded verbatim to the core's own cheat subsystem.
    CoreOpaque { code: String },
    /// Interpreted by this engine.
    EngineApplied(MemoryPatch),
}

/// Numeric handler code used by the cheat file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum Handler {
    #[default]
    CoreOpaque = 0,
    EngineApplied = 1,
}

impl Handler {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }
}

/// One entry of the cheat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatCode {
    pub index: u32,
    pub description: Option<String>,
    pub enabled: bool,
    pub kind: CheatKind,
}

impl CheatCode {
    /// Empty entry of the given handler, as created when the list grows.
    pub fn blank(index: u32, handler: Handler) -> Self {
        let kind = match handler {
            Handler::CoreOpaque => CheatKind::CoreOpaque {
                code: String::new(),
            },
            Handler::EngineApplied => CheatKind::EngineApplied(MemoryPatch::default()),
        };
        Self {
            index,
            description: None,
            enabled: false,
            kind,
        }
    }

    pub fn core_opaque(description: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            index: 0,
            description: Some(description.into()),
            enabled: false,
            kind: CheatKind::CoreOpaque { code: code.into() },
        }
    }

    pub fn engine_applied(patch: MemoryPatch) -> Self {
        Self {
            index: 0,
            description: None,
            enabled: false,
            kind: CheatKind::EngineApplied(patch),
        }
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    pub fn handler(&self) -> Handler {
        match self.kind {
            CheatKind::CoreOpaque { .. } => Handler::CoreOpaque,
            CheatKind::EngineApplied(_) => Handler::EngineApplied,
        }
    }

    pub fn patch(&self) -> Option<&MemoryPatch> {
        match &self.kind {
            CheatKind::EngineApplied(patch) => Some(patch),
            CheatKind::CoreOpaque { .. } => None,
        }
    }

    pub fn patch_mut(&mut self) -> Option<&mut MemoryPatch> {
        match &mut self.kind {
            CheatKind::EngineApplied(patch) => Some(patch),
            CheatKind::CoreOpaque { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match &self.kind {
            CheatKind::CoreOpaque { code } => Some(code),
            CheatKind::EngineApplied(_) => None,
        }
    }

    /// Label for notifications and listings.
    pub fn label(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => self.code().unwrap_or("(no description)"),
        }
    }
}
