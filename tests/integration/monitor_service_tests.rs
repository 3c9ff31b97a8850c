//! Integration tests for the MonitorService → BeltMonitor → relay pipeline.
//!
//! These run on the host and drive the service one tick per simulated
//! second, exactly as the firmware's sample timer does, with scripted
//! sense-line voltages.

use beltguard::app::commands::SupervisorCommand;
use beltguard::app::service::MonitorService;
use beltguard::belt::event::LoopEvent;
use beltguard::belt::state::MonitorPhase;
use beltguard::config::{MonitorConfig, SystemConfig};
use beltguard::indicator::{IndicatorPattern, MonitorFlags};

use crate::mock_hw::{
    FlakyPin, FlakyRelayHardware, ManualClock, MockConfigStore, MockHardware, RecordingSink,
};

const RESTING_MV: u32 = 3000;
const PASS_DEPTH_MV: u32 = 150;

/// Tick once per second over `seconds`, returning `(second, status)` for
/// every emitted event.
fn run(
    svc: &mut MonitorService<'_>,
    hw: &mut MockHardware,
    clock: &ManualClock,
    sink: &mut RecordingSink,
    seconds: core::ops::RangeInclusive<u64>,
) -> Vec<(u64, u8)> {
    seconds
        .filter_map(|s| {
            clock.set(s * 1000);
            svc.tick(hw, clock, sink).map(|e| (s, e.status().as_u8()))
        })
        .collect()
}

// ── Normal running and a rip ──────────────────────────────────

#[test]
fn loop_rip_and_recovery_drive_the_relay() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    hw.push(RESTING_MV) // baseline
        .idle(1) // t=1
        .pass(PASS_DEPTH_MV) // t=2
        .idle(9) // t=3..=11
        .pass(PASS_DEPTH_MV) // t=12
        .idle(18) // t=13..=30
        .pass(PASS_DEPTH_MV); // t=31
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();

    assert_eq!(svc.start(&mut hw), Some(RESTING_MV));
    assert_eq!(flags.pattern(), IndicatorPattern::Startup);

    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 1..=12);
    assert_eq!(timeline, vec![(2, 1), (12, 2)]);
    assert_eq!(svc.phase(), MonitorPhase::Running);
    assert_eq!(flags.pattern(), IndicatorPattern::Running);

    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 13..=28);
    assert_eq!(timeline, vec![(17, 4), (22, 4), (27, 4), (28, 3)]);
    assert!(hw.relay(), "rip must energise the relay");
    assert_eq!(flags.pattern(), IndicatorPattern::Alarm);
    assert_eq!(svc.phase(), MonitorPhase::Ripped);

    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 29..=31);
    assert_eq!(timeline, vec![(31, 2)], "latched alarm is reported once");
    assert!(!hw.relay(), "next accepted loop releases the relay");
    assert_eq!(flags.pattern(), IndicatorPattern::Running);

    assert_eq!(hw.relay_calls, vec![false, true, false]);
    assert_eq!(
        sink.events.last(),
        Some(&LoopEvent::LoopOk {
            voltage: RESTING_MV - PASS_DEPTH_MV,
            interval: core::time::Duration::from_millis(19_000),
        })
    );
    assert_eq!(svc.stats().confirmed_loops, 2);
    assert_eq!(svc.stats().rip_episodes, 1);
}

#[test]
fn idle_line_only_sends_waiting_heartbeats() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw);

    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 1..=60);
    assert_eq!(
        timeline,
        (1..=12).map(|k| (k * 5, 0)).collect::<Vec<_>>()
    );
    assert_eq!(hw.relay_calls, vec![false]);
    assert_eq!(svc.phase(), MonitorPhase::Waiting);
}

#[test]
fn failed_energise_write_is_retried_while_ripped() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut sense = MockHardware::new(RESTING_MV);
    sense
        .push(RESTING_MV) // baseline
        .idle(2) // t=1..=2
        .pass(PASS_DEPTH_MV); // t=3
    let mut hw = FlakyRelayHardware::new(sense, FlakyPin { fail_high: 1 });
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw);

    let mut rip_at = None;
    for s in 1..=60 {
        clock.set(s * 1000);
        if let Some(LoopEvent::Rip { .. }) = svc.tick(&mut hw, &clock, &mut sink) {
            rip_at = Some(s);
            // The energise write at the rip tick was rejected.
            assert_eq!(hw.relay.is_asserted(), None);
        }
    }

    assert_eq!(rip_at, Some(19));
    assert!(svc.relay_asserted());
    assert_eq!(hw.relay.is_asserted(), Some(true));
}

// ── Sensor failure ────────────────────────────────────────────

#[test]
fn persistent_sample_failure_ends_in_rip_alarm() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    hw.push(RESTING_MV).pass(PASS_DEPTH_MV);
    for _ in 0..20 {
        hw.push_failure();
    }
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw);

    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 1..=21);
    assert_eq!(timeline, vec![(1, 1), (6, 4), (11, 4), (16, 4), (17, 3)]);
    assert!(hw.relay());
    assert_eq!(svc.sample_failures(), 20);
    assert!(matches!(
        sink.events.last(),
        Some(LoopEvent::Rip { voltage, .. }) if *voltage == RESTING_MV - PASS_DEPTH_MV
    ));

    // Sensor recovers on a steady line: still ripped, counter cleared.
    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 22..=25);
    assert!(timeline.is_empty());
    assert_eq!(svc.sample_failures(), 0);
    assert!(svc.relay_asserted());
}

#[test]
fn failed_baseline_sample_does_not_fake_a_loop() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    hw.push_failure();
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();

    assert_eq!(svc.start(&mut hw), None);
    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 1..=5);
    assert_eq!(timeline, vec![(5, 0)]);
}

// ── Supervisor commands ───────────────────────────────────────

#[test]
fn reset_clears_the_latched_alarm() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    hw.push(RESTING_MV).pass(PASS_DEPTH_MV);
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    let mut store = MockConfigStore::default();
    svc.start(&mut hw);

    run(&mut svc, &mut hw, &clock, &mut sink, 1..=20);
    assert!(hw.relay());

    let cmd = SupervisorCommand::parse("reset").unwrap();
    svc.handle_command(cmd, &mut hw, &mut store);
    assert!(!hw.relay());
    assert_eq!(svc.phase(), MonitorPhase::Waiting);
    assert_eq!(flags.pattern(), IndicatorPattern::Startup);

    // Back to waiting: heartbeats only, the old alarm does not re-fire.
    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 21..=40);
    assert!(timeline.iter().all(|&(_, status)| status == 0));
    assert!(!timeline.is_empty());
    assert!(!hw.relay());
}

#[test]
fn staged_config_is_validated_and_persisted_only() {
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(RESTING_MV);
    let mut store = MockConfigStore::default();

    let mut bad = SystemConfig::default();
    bad.monitor.check_interval_ms = 0;
    svc.handle_command(SupervisorCommand::StageConfig(bad), &mut hw, &mut store);
    assert_eq!(store.saved, None);

    let mut good = SystemConfig::default();
    good.monitor.drop_threshold_mv = 400;
    svc.handle_command(SupervisorCommand::StageConfig(good), &mut hw, &mut store);
    assert_eq!(store.saved, Some(good));

    // The running monitor keeps its construction-time threshold: a 150 mV
    // dip is still an edge.
    hw.push(RESTING_MV).pass(PASS_DEPTH_MV);
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut hw);
    let timeline = run(&mut svc, &mut hw, &clock, &mut sink, 1..=1);
    assert_eq!(timeline, vec![(1, 1)]);
}
