//! Status link end to end: service events → frame queue → wire lines.

use std::sync::mpsc;
use std::time::Duration;

use beltguard::adapters::status_link::{run_status_writer, StatusChannel, StatusLinkSink};
use beltguard::app::ports::EventSink;
use beltguard::app::service::MonitorService;
use beltguard::belt::event::LoopEvent;
use beltguard::config::MonitorConfig;
use beltguard::indicator::MonitorFlags;
use embassy_sync::channel::Channel;

use crate::mock_hw::{ManualClock, MockHardware, RecordingSink};

#[test]
fn scenario_produces_expected_wire_lines() {
    let channel: StatusChannel<16> = Channel::new();
    let flags = MonitorFlags::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &flags);
    let mut hw = MockHardware::new(3000);
    hw.push(3000).idle(1).pass(150).idle(9).pass(150);
    let clock = ManualClock::new();
    let mut sink = (StatusLinkSink::new(&channel), RecordingSink::new());
    svc.start(&mut hw);

    for s in 1..=28 {
        clock.set(s * 1000);
        svc.tick(&mut hw, &clock, &mut sink);
    }

    let mut lines = Vec::new();
    while let Ok(frame) = channel.try_receive() {
        lines.push(frame.encode().to_string());
    }
    assert_eq!(
        lines,
        vec![
            "S:1,V:2850,I:0,T:0\n",
            "S:2,V:2850,I:10000,T:0\n",
            "S:4,V:3000,I:0,T:5000\n",
            "S:4,V:3000,I:0,T:10000\n",
            "S:4,V:3000,I:0,T:15000\n",
            "S:3,V:3000,I:0,T:16000\n",
        ]
    );
    assert_eq!(sink.1.events.len(), lines.len());
    assert_eq!(sink.0.dropped(), 0);
}

static WRITER_CHANNEL: StatusChannel<4> = Channel::new();

#[test]
fn writer_thread_drains_in_order() {
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        run_status_writer(&WRITER_CHANNEL, |line| {
            let _ = tx.send(line.to_owned());
        });
    });

    let mut sink = StatusLinkSink::new(&WRITER_CHANNEL);
    sink.emit(&LoopEvent::Waiting { voltage: 5000 });
    sink.emit(&LoopEvent::FirstLoop { voltage: 4700 });

    let timeout = Duration::from_secs(2);
    assert_eq!(rx.recv_timeout(timeout).unwrap(), "S:0,V:5000,I:0,T:0\n");
    assert_eq!(rx.recv_timeout(timeout).unwrap(), "S:1,V:4700,I:0,T:0\n");
}
