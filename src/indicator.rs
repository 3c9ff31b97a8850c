//! Status indicator: pattern derivation and blink sequencing.
//!
//! The pattern is a pure function of the two latched monitor flags, so the
//! LED can never disagree with the alarm state.
//!
//! | belt_ripped | first_drop_detected | Pattern  | Cadence               |
//! |-------------|---------------------|----------|-----------------------|
//! | true        | —                   | Alarm    | 200 ms off / 200 ms on|
//! | false       | true                | Running  | off, re-check 1000 ms |
//! | false       | false               | Startup  | 500 ms off / 500 ms on|
//!
//! The indicator runs on its own cadence, independent of the sampling
//! tick. It only reads [`MonitorFlags`], which the sampling loop publishes
//! after every tick. Both flags live in one atomic byte so a reader never
//! sees half of an update.

use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;

use crate::app::ports::IndicatorPort;
use crate::belt::state::BeltMonitorState;

const FLAG_FIRST_DROP: u8 = 0b0000_0001;
const FLAG_RIPPED: u8 = 0b0000_0010;

/// One LED level held for a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkStep {
    pub lit: bool,
    pub hold_ms: u32,
}

impl BlinkStep {
    pub const fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms as u64)
    }
}

const ALARM_STEPS: [BlinkStep; 2] = [
    BlinkStep { lit: false, hold_ms: 200 },
    BlinkStep { lit: true, hold_ms: 200 },
];
const RUNNING_STEPS: [BlinkStep; 1] = [BlinkStep { lit: false, hold_ms: 1000 }];
const STARTUP_STEPS: [BlinkStep; 2] = [
    BlinkStep { lit: false, hold_ms: 500 },
    BlinkStep { lit: true, hold_ms: 500 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPattern {
    /// Rip latched: fast blink.
    Alarm,
    /// Belt looping normally: LED off.
    Running,
    /// Waiting for the first loop: slow blink.
    Startup,
}

impl IndicatorPattern {
    pub fn from_flags(belt_ripped: bool, first_drop_detected: bool) -> Self {
        if belt_ripped {
            Self::Alarm
        } else if first_drop_detected {
            Self::Running
        } else {
            Self::Startup
        }
    }

    pub fn steps(self) -> &'static [BlinkStep] {
        match self {
            Self::Alarm => &ALARM_STEPS,
            Self::Running => &RUNNING_STEPS,
            Self::Startup => &STARTUP_STEPS,
        }
    }
}

// ── Shared flag cell ──────────────────────────────────────────

/// Flags published by the sampling loop (sole writer) for the indicator
/// loop (reader). A one-tick-stale read is acceptable.
#[derive(Debug, Default)]
pub struct MonitorFlags(AtomicU8);

impl MonitorFlags {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    pub fn publish(&self, state: &BeltMonitorState) {
        let mut bits = 0;
        if state.first_drop_detected {
            bits |= FLAG_FIRST_DROP;
        }
        if state.belt_ripped {
            bits |= FLAG_RIPPED;
        }
        self.0.store(bits, Ordering::Release);
    }

    /// `(belt_ripped, first_drop_detected)` from a single load.
    pub fn load(&self) -> (bool, bool) {
        let bits = self.0.load(Ordering::Acquire);
        (bits & FLAG_RIPPED != 0, bits & FLAG_FIRST_DROP != 0)
    }

    pub fn pattern(&self) -> IndicatorPattern {
        let (ripped, first) = self.load();
        IndicatorPattern::from_flags(ripped, first)
    }
}

// ── Sequencer ─────────────────────────────────────────────────

/// Walks the steps of the current pattern, restarting whenever it changes.
#[derive(Debug, Default)]
pub struct IndicatorController {
    pattern: Option<IndicatorPattern>,
    index: usize,
}

impl IndicatorController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The step to show next for `pattern`.
    pub fn next_step(&mut self, pattern: IndicatorPattern) -> BlinkStep {
        if self.pattern != Some(pattern) {
            self.pattern = Some(pattern);
            self.index = 0;
        }
        let steps = pattern.steps();
        let step = steps[self.index % steps.len()];
        self.index = (self.index + 1) % steps.len();
        step
    }

    /// Read the flags, drive the LED, and return how long to hold it.
    pub fn step(&mut self, flags: &MonitorFlags, led: &mut impl IndicatorPort) -> Duration {
        let step = self.next_step(flags.pattern());
        led.set_indicator(step.lit);
        step.hold()
    }

    pub fn current_pattern(&self) -> Option<IndicatorPattern> {
        self.pattern
    }
}

/// Indicator thread body: step the pattern forever at its own cadence.
pub fn run_indicator(flags: &MonitorFlags, led: &mut impl IndicatorPort) {
    let mut ctl = IndicatorController::new();
    loop {
        let hold = ctl.step(flags, led);
        std::thread::sleep(hold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Led(Vec<bool>);

    impl IndicatorPort for Led {
        fn set_indicator(&mut self, lit: bool) {
            self.0.push(lit);
        }
    }

    #[test]
    fn ripped_wins_over_first_drop() {
        assert_eq!(IndicatorPattern::from_flags(true, true), IndicatorPattern::Alarm);
        assert_eq!(IndicatorPattern::from_flags(true, false), IndicatorPattern::Alarm);
        assert_eq!(IndicatorPattern::from_flags(false, true), IndicatorPattern::Running);
        assert_eq!(IndicatorPattern::from_flags(false, false), IndicatorPattern::Startup);
    }

    #[test]
    fn cadences() {
        let on_off = |p: IndicatorPattern| -> Vec<(bool, u32)> {
            p.steps().iter().map(|s| (s.lit, s.hold_ms)).collect()
        };
        assert_eq!(on_off(IndicatorPattern::Alarm), vec![(false, 200), (true, 200)]);
        assert_eq!(on_off(IndicatorPattern::Running), vec![(false, 1000)]);
        assert_eq!(on_off(IndicatorPattern::Startup), vec![(false, 500), (true, 500)]);
    }

    #[test]
    fn flags_round_trip_through_publish() {
        let flags = MonitorFlags::new();
        let mut s = BeltMonitorState::new(Duration::from_secs(10));
        assert_eq!(flags.pattern(), IndicatorPattern::Startup);

        s.first_drop_detected = true;
        flags.publish(&s);
        assert_eq!(flags.load(), (false, true));

        s.belt_ripped = true;
        flags.publish(&s);
        assert_eq!(flags.pattern(), IndicatorPattern::Alarm);
    }

    #[test]
    fn sequencer_alternates_and_restarts_on_change() {
        let mut ctl = IndicatorController::new();
        let flags = MonitorFlags::new();
        let mut led = Led(Vec::new());

        assert_eq!(ctl.step(&flags, &mut led), Duration::from_millis(500));
        assert_eq!(ctl.step(&flags, &mut led), Duration::from_millis(500));
        assert_eq!(ctl.step(&flags, &mut led), Duration::from_millis(500));
        assert_eq!(led.0, vec![false, true, false]);

        let mut s = BeltMonitorState::new(Duration::from_secs(10));
        s.first_drop_detected = true;
        s.belt_ripped = true;
        flags.publish(&s);
        assert_eq!(ctl.step(&flags, &mut led), Duration::from_millis(200));
        assert_eq!(led.0.last(), Some(&false), "alarm starts from its first step");
        assert_eq!(ctl.current_pattern(), Some(IndicatorPattern::Alarm));
    }
}
