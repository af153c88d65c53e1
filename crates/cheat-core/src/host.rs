//! Interfaces to the host frontend and the emulation core.
//!
//! The engine never owns emulated memory, haptic devices or the core's own
//! cheat list; it reaches them through these traits so that any frontend
//! (or a test double) can drive it.

use serde::{Deserialize, Serialize};
use strum::{FromRepr, IntoStaticStr};
use tracing::info;

/// Memory regions a core can expose.
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
pub enum RegionId {
    SaveRam = 0,
    Rtc = 1,
    #[default]
    SystemRam = 2,
    VideoRam = 3,
}

/// Access to the emulated memory owned by the core.
///
/// The region is assumed stable (same size) for as long as a search session
/// uses it; a size change is reported as an error rather than followed.
pub trait CoreMemory {
    fn region(&self, id: RegionId) -> Option<&[u8]>;

    fn region_mut(&mut self, id: RegionId) -> Option<&mut [u8]>;
}

/// On-screen notification sink.
pub trait Notifier {
    fn push(&mut self, message: &str, priority: u32, duration_frames: u32);
}

/// Rumble motor selected by a cheat's primary or secondary settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum RumbleChannel {
    /// Primary (strong) motor.
    Strong,
    /// Secondary (weak) motor.
    Weak,
}

/// Haptic output sink.
pub trait Haptics {
    fn set_rumble(&mut self, port: u32, channel: RumbleChannel, strength: u16);
}

/// The core's own cheat subsystem, fed with opaque cheat codes.
pub trait CoreCheats {
    fn cheat_reset(&mut self);

    fn cheat_set(&mut self, index: u32, enabled: bool, code: &str);
}

/// Notifier that writes every message to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn push(&mut self, message: &str, _priority: u32, _duration_frames: u32) {
        info!("{}", message);
    }
}

/// Haptics sink for hosts without rumble support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn set_rumble(&mut self, _port: u32, _channel: RumbleChannel, _strength: u16) {}
}

/// Core without a cheat subsystem of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCoreCheats;

impl CoreCheats for NoCoreCheats {
    fn cheat_reset(&mut self) {}

    fn cheat_set(&mut self, _index: u32, _enabled: bool, _code: &str) {}
}
