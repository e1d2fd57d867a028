//! End-to-end radio loop tests: button presses on a mock pin flow through
//! `RadioApp::run_iteration` into the playback supervisor and its mock
//! streams.
//!
//! Run with: cargo test -p firmware --test integration_failover

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use firmware::app::RadioApp;
use firmware::input::{ClassifierBuilder, Gesture};
use platform::mocks::{MockClock, MockPin, MockSessionFactory, StreamBehaviour};
use playback::{
    Direction, PlaybackSupervisor, RetryPolicy, Station, StationCatalog, SupervisorState,
    TickOutcome,
};

type App = RadioApp<MockPin, MockSessionFactory, MockClock>;

struct Rig {
    app: App,
    pin: MockPin,
    factory: MockSessionFactory,
    clock: MockClock,
}

fn uri(name: &str) -> String {
    format!("http://radio.example/{name}")
}

fn rig(names: &[&str], behaviours: &[(&str, StreamBehaviour)]) -> Rig {
    let stations: Vec<Station> = names
        .iter()
        .map(|n| Station::new(n, &uri(n)).unwrap())
        .collect();
    let factory = MockSessionFactory::new();
    for (name, behaviour) in behaviours {
        factory.set_behaviour(&uri(name), *behaviour);
    }
    let clock = MockClock::at(1_000);
    let pin = MockPin::new();

    let supervisor = PlaybackSupervisor::new(
        StationCatalog::new(stations).unwrap(),
        factory.clone(),
        clock.clone(),
        RetryPolicy::default(),
    );
    let button = ClassifierBuilder::new().build_button(pin.clone()).unwrap();
    let mut app = RadioApp::new(button, supervisor, false);
    app.supervisor_mut().select_and_play(Direction::Same);
    Rig {
        app,
        pin,
        factory,
        clock,
    }
}

impl Rig {
    /// Run the loop every 5 ms for `ms`; returns the gestures seen.
    fn run(&mut self, ms: u64) -> Vec<Gesture> {
        let mut gestures = Vec::new();
        for _ in 0..ms / 5 {
            if let Some(g) = self.app.run_iteration().gesture {
                gestures.push(g);
            }
            self.clock.advance(5);
        }
        gestures
    }

    fn press_for(&mut self, ms: u64) -> Vec<Gesture> {
        self.pin.press();
        let mut seen = self.run(ms);
        self.pin.release();
        seen.extend(self.run(400));
        seen
    }

    fn current(&self) -> String {
        self.app.supervisor().catalog().current().name.to_string()
    }
}

#[test]
fn test_click_tunes_to_next_station() {
    let mut rig = rig(&["a", "b", "c"], &[]);
    assert_eq!(rig.press_for(100), vec![Gesture::Click]);
    assert_eq!(rig.current(), "b");
    assert_eq!(rig.app.supervisor().state(), SupervisorState::Running);
    assert_eq!(rig.factory.attempts(), vec![uri("a"), uri("b")]);
    // Old session torn down, new one fully held.
    assert_eq!(rig.factory.live_resources(), 3);
}

#[test]
fn test_long_click_tunes_to_previous_station() {
    let mut rig = rig(&["a", "b", "c"], &[]);
    assert_eq!(rig.press_for(500), vec![Gesture::LongClick]);
    assert_eq!(rig.current(), "c");
    assert_eq!(rig.factory.attempts(), vec![uri("a"), uri("c")]);
}

#[test]
fn test_double_click_leaves_playback_alone() {
    let mut rig = rig(&["a", "b"], &[]);
    rig.pin.press();
    rig.run(100);
    rig.pin.release();
    rig.run(100);
    assert_eq!(rig.press_for(100), vec![Gesture::DoubleClick]);
    assert_eq!(rig.current(), "a");
    assert_eq!(rig.factory.sessions_created(), 1);
    assert_eq!(rig.app.supervisor().state(), SupervisorState::Running);
}

#[test]
fn test_ended_stream_retried_then_failed_over() {
    let mut rig = rig(&["a", "b"], &[("a", StreamBehaviour::EndAfter(10))]);
    rig.run(7_000);
    assert_eq!(
        rig.factory.attempts(),
        vec![uri("a"), uri("a"), uri("a"), uri("b")]
    );
    assert_eq!(rig.current(), "b");
    assert_eq!(rig.app.supervisor().retry_count(), 0);
    assert_eq!(rig.factory.live_resources(), 3);
}

#[test]
fn test_click_during_cooldown_abandons_retry() {
    let mut rig = rig(&["a", "b"], &[("a", StreamBehaviour::EndAfter(5))]);
    rig.run(200);
    assert!(matches!(
        rig.app.supervisor().state(),
        SupervisorState::Failed { .. }
    ));

    assert_eq!(rig.press_for(100), vec![Gesture::Click]);
    assert_eq!(rig.current(), "b");
    rig.run(3_000);
    assert_eq!(rig.factory.attempts(), vec![uri("a"), uri("b")]);
    assert_eq!(rig.app.supervisor().state(), SupervisorState::Running);
}

#[test]
fn test_unreachable_station_skipped_on_click() {
    let mut rig = rig(&["a", "b", "c"], &[("b", StreamBehaviour::Refuse)]);
    rig.press_for(100);
    assert_eq!(rig.current(), "c");
    assert_eq!(rig.factory.attempts(), vec![uri("a"), uri("b"), uri("c")]);
    assert_eq!(rig.factory.live_resources(), 3);
}

#[test]
fn test_stopped_radio_is_not_ticked_until_click() {
    let mut rig = rig(&["a", "b"], &[]);
    rig.app.supervisor_mut().stop();
    assert_eq!(rig.app.run_iteration().tick, None);
    assert_eq!(rig.factory.live_resources(), 0);

    rig.press_for(100);
    assert_eq!(rig.current(), "b");
    assert_eq!(rig.app.run_iteration().tick, Some(TickOutcome::Playing));
}
