//! Rumble trigger evaluation.
//!
//! Each engine-applied cheat can watch its value and pulse one or two rumble
//! motors when the value moves in a configured way. Output is suppressed for
//! a warm-up period after (re)activation so that the first frames of a game
//! (where memory is still being initialised) do not fire spurious pulses.

use std::time::{Duration, Instant};

use crate::config::rumble::WARMUP_EVALUATIONS;
use crate::host::{Haptics, RumbleChannel};

use super::code::{RumbleConfig, RumbleKind};

/// Runtime-only rumble state of one cheat. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RumbleState {
    prev_value: u32,
    warmup: u32,
    primary_end: Option<Instant>,
    secondary_end: Option<Instant>,
}

impl RumbleState {
    pub fn prev_value(&self) -> u32 {
        self.prev_value
    }

    pub fn is_warming_up(&self) -> bool {
        self.warmup < WARMUP_EVALUATIONS
    }

    /// True while either motor is inside a pulse that has not been released.
    pub fn is_pulsing(&self) -> bool {
        self.primary_end.is_some() || self.secondary_end.is_some()
    }

    /// Start a new warm-up. A running pulse is left for [`release`](Self::release).
    pub fn restart(&mut self) {
        self.prev_value = 0;
        self.warmup = 0;
    }

    /// End any running pulse now with a single zero per active motor.
    pub fn release<H: Haptics + ?Sized>(&mut self, port: u32, haptics: &mut H) {
        if self.primary_end.take().is_some() {
            haptics.set_rumble(port, RumbleChannel::Strong, 0);
        }
        if self.secondary_end.take().is_some() {
            haptics.set_rumble(port, RumbleChannel::Weak, 0);
        }
    }

    /// Evaluate one frame with the watched value `curr`.
    pub fn evaluate<H: Haptics + ?Sized>(
        &mut self,
        config: &RumbleConfig,
        curr: u32,
        now: Instant,
        haptics: &mut H,
    ) {
        if config.kind == RumbleKind::Disabled {
            self.release(config.port, haptics);
            return;
        }

        let fired = config.kind.triggered(curr, self.prev_value, config.value);
        self.prev_value = curr;

        if self.is_warming_up() {
            self.warmup += 1;
            self.release(config.port, haptics);
            return;
        }

        if fired {
            self.primary_end =
                Some(now + Duration::from_millis(u64::from(config.primary_duration_ms)));
            self.secondary_end =
                Some(now + Duration::from_millis(u64::from(config.secondary_duration_ms)));
        }

        drive_channel(
            &mut self.primary_end,
            now,
            config.port,
            RumbleChannel::Strong,
            config.primary_strength,
            haptics,
        );
        drive_channel(
            &mut self.secondary_end,
            now,
            config.port,
            RumbleChannel::Weak,
            config.secondary_strength,
            haptics,
        );
    }
}

/// Re-assert the channel while its pulse lasts, then send a single zero.
fn drive_channel<H: Haptics + ?Sized>(
    end: &mut Option<Instant>,
    now: Instant,
    port: u32,
    channel: RumbleChannel,
    strength: u16,
    haptics: &mut H,
) {
    match *end {
        Some(until) if until > now => haptics.set_rumble(port, channel, strength),
        Some(_) => {
            haptics.set_rumble(port, channel, 0);
            *end = None;
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::mock::RecordingHaptics;

    fn config(kind: RumbleKind) -> RumbleConfig {
        RumbleConfig {
            kind,
            value: 0,
            port: 1,
            primary_strength: 0xFFFF,
            primary_duration_ms: 100,
            secondary_strength: 0x8000,
            secondary_duration_ms: 50,
        }
    }

    fn warmed_up() -> RumbleState {
        RumbleState {
            warmup: WARMUP_EVALUATIONS,
            ..Default::default()
        }
    }

    #[test]
    fn test_warmup_suppresses_output() {
        let mut state = RumbleState::default();
        let mut haptics = RecordingHaptics::new();
        let cfg = config(RumbleKind::Changes);
        let now = Instant::now();

        for i in 0..WARMUP_EVALUATIONS {
            state.evaluate(&cfg, i, now, &mut haptics);
        }
        assert!(haptics.events.is_empty());
        assert_eq!(state.prev_value(), WARMUP_EVALUATIONS - 1);
        assert!(!state.is_warming_up());

        state.evaluate(&cfg, 0, now, &mut haptics);
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0xFFFF]);
    }

    #[test]
    fn test_pulse_then_single_reset() {
        let mut state = warmed_up();
        let mut haptics = RecordingHaptics::new();
        let cfg = config(RumbleKind::Increase);
        let start = Instant::now();

        state.evaluate(&cfg, 1, start, &mut haptics);
        state.evaluate(&cfg, 1, start + Duration::from_millis(60), &mut haptics);
        state.evaluate(&cfg, 1, start + Duration::from_millis(120), &mut haptics);
        state.evaluate(&cfg, 1, start + Duration::from_millis(200), &mut haptics);

        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0xFFFF, 0xFFFF, 0]);
        assert_eq!(haptics.channel(RumbleChannel::Weak), vec![0x8000, 0]);
        assert!(haptics.events.iter().all(|(port, _, _)| *port == 1));
    }

    #[test]
    fn test_restart_releases_running_pulse() {
        let mut state = warmed_up();
        let mut haptics = RecordingHaptics::new();
        let cfg = config(RumbleKind::Changes);
        let start = Instant::now();

        state.evaluate(&cfg, 1, start, &mut haptics);
        assert!(state.is_pulsing());
        haptics.clear();

        state.restart();
        assert!(state.is_warming_up());
        state.evaluate(&cfg, 2, start + Duration::from_millis(10), &mut haptics);
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0]);
        assert_eq!(haptics.channel(RumbleChannel::Weak), vec![0]);
        assert!(!state.is_pulsing());

        // Nothing left to release
        state.evaluate(&cfg, 3, start + Duration::from_millis(20), &mut haptics);
        assert_eq!(haptics.events.len(), 2);
    }

    #[test]
    fn test_release_is_noop_when_idle() {
        let mut state = warmed_up();
        let mut haptics = RecordingHaptics::new();
        state.release(0, &mut haptics);
        assert!(haptics.events.is_empty());
    }

    #[test]
    fn test_disabled_is_inert() {
        let mut state = warmed_up();
        let mut haptics = RecordingHaptics::new();
        state.evaluate(&config(RumbleKind::Disabled), 5, Instant::now(), &mut haptics);
        assert!(haptics.events.is_empty());
        assert_eq!(state.prev_value(), 0);
    }

    #[test]
    fn test_compare_against_fixed_value() {
        let mut state = warmed_up();
        let mut haptics = RecordingHaptics::new();
        let cfg = RumbleConfig {
            value: 10,
            ..config(RumbleKind::LtValue)
        };
        let now = Instant::now();

        state.evaluate(&cfg, 12, now, &mut haptics);
        assert!(haptics.events.is_empty());
        state.evaluate(&cfg, 9, now, &mut haptics);
        assert_eq!(haptics.channel(RumbleChannel::Strong), vec![0xFFFF]);
    }
}
