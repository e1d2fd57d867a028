//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests. Mocks share their state through
//! `Rc` handles: clone a mock, move one copy into the code under test and
//! keep the other to drive inputs and inspect what happened.

#![cfg(any(test, feature = "std"))]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use embassy_time::Instant;
use embedded_hal::digital::{self, ErrorKind, ErrorType};

use crate::audio::{AudioSession, SessionEvent, SessionFactory, StepOutcome};
use crate::audio_types::Gain;
use crate::clock::Clock;
use crate::network::{Credentials, LinkInfo, NetworkLink};

// ── Pin ─────────────────────────────────────────────────────────────────────

/// Error returned by [`MockPin`] when a read failure was injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Push button input whose level is set by the test.
///
/// Starts released with pull-up wiring (electrically high).
#[derive(Debug, Clone)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
    fail_reads: Rc<Cell<u32>>,
}

impl MockPin {
    /// Create a released (high) pin.
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
            fail_reads: Rc::new(Cell::new(0)),
        }
    }

    /// Drive the line low (button pressed with pull-up wiring).
    pub fn press(&self) {
        self.high.set(false);
    }

    /// Drive the line high (button released with pull-up wiring).
    pub fn release(&self) {
        self.high.set(true);
    }

    /// Set the electrical level directly.
    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }

    /// Make the next `count` reads fail.
    pub fn fail_next_reads(&self, count: u32) {
        self.fail_reads.set(count);
    }

    fn read(&self) -> Result<bool, MockPinError> {
        let pending = self.fail_reads.get();
        if pending > 0 {
            self.fail_reads.set(pending.saturating_sub(1));
            return Err(MockPinError);
        }
        Ok(self.high.get())
    }
}

impl Default for MockPin {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.read()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.read().map(|high| !high)
    }
}

// ── Clock ───────────────────────────────────────────────────────────────────

/// Manually advanced millisecond clock.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    millis: Rc<Cell<u64>>,
}

impl MockClock {
    /// Create a clock reading `start_ms`.
    pub fn at(start_ms: u64) -> Self {
        Self {
            millis: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.millis.set(self.millis.get().saturating_add(ms));
    }

    /// Jump to an absolute time. Tests must not move backwards.
    pub fn set(&self, ms: u64) {
        self.millis.set(ms);
    }

    /// Current reading in milliseconds.
    pub fn millis(&self) -> u64 {
        self.millis.get()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}

// ── Audio sessions ──────────────────────────────────────────────────────────

/// How a mock stream behaves when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamBehaviour {
    /// Plays forever.
    #[default]
    Healthy,
    /// Source connects but `start` fails (host unreachable, bad header).
    Refuse,
    /// `start` succeeds but the decoder never reports running.
    Stalled,
    /// Plays for the given number of steps, then ends.
    EndAfter(u32),
}

/// One of the three resources a session holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Network source.
    Source,
    /// Read-ahead buffer.
    Buffer,
    /// Decoder.
    Decoder,
}

/// Entry in the shared session log.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionRecord {
    /// `start` was called for this URI.
    Start(String),
    /// `start` for this URI failed.
    Refused(String),
    /// A resource was acquired.
    Acquired(Resource),
    /// A resource was released.
    Released(Resource),
    /// `set_gain` was called.
    Gain(f32),
    /// A queued notification was handed to the caller.
    Drained(SessionEvent),
}

/// Error returned by [`MockSession::start`] for refused streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStreamError {
    /// URI that was refused.
    pub uri: String,
}

impl core::fmt::Display for MockStreamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "stream refused: {}", self.uri)
    }
}

impl std::error::Error for MockStreamError {}

#[derive(Debug, Default)]
struct SessionShared {
    behaviours: HashMap<String, StreamBehaviour>,
    events: HashMap<String, VecDeque<SessionEvent>>,
    log: Vec<SessionRecord>,
    created: usize,
}

/// Factory producing [`MockSession`]s with per-URI behaviour.
#[derive(Debug, Clone, Default)]
pub struct MockSessionFactory {
    shared: Rc<RefCell<SessionShared>>,
}

impl MockSessionFactory {
    /// All streams healthy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure how `uri` behaves on subsequent opens.
    pub fn set_behaviour(&self, uri: &str, behaviour: StreamBehaviour) {
        self.shared
            .borrow_mut()
            .behaviours
            .insert(uri.to_string(), behaviour);
    }

    /// Queue a notification delivered by the next session that opens `uri`.
    pub fn queue_event(&self, uri: &str, event: SessionEvent) {
        self.shared
            .borrow_mut()
            .events
            .entry(uri.to_string())
            .or_default()
            .push_back(event);
    }

    /// Everything recorded so far.
    pub fn log(&self) -> Vec<SessionRecord> {
        self.shared.borrow().log.clone()
    }

    /// Forget recorded history.
    pub fn clear_log(&self) {
        self.shared.borrow_mut().log.clear();
    }

    /// URIs passed to `start`, in order.
    pub fn attempts(&self) -> Vec<String> {
        self.shared
            .borrow()
            .log
            .iter()
            .filter_map(|r| match r {
                SessionRecord::Start(uri) => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    /// Notifications the supervisor has taken from sessions, in order.
    pub fn drained_events(&self) -> Vec<SessionEvent> {
        self.shared
            .borrow()
            .log
            .iter()
            .filter_map(|r| match r {
                SessionRecord::Drained(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of sessions handed out.
    pub fn sessions_created(&self) -> usize {
        self.shared.borrow().created
    }

    /// Resources acquired but not yet released, across all sessions.
    pub fn live_resources(&self) -> usize {
        self.shared
            .borrow()
            .log
            .iter()
            .fold(0usize, |live, r| match r {
                SessionRecord::Acquired(_) => live.saturating_add(1),
                SessionRecord::Released(_) => live.saturating_sub(1),
                _ => live,
            })
    }

    /// Last gain applied to any session.
    pub fn last_gain(&self) -> Option<f32> {
        self.shared.borrow().log.iter().rev().find_map(|r| match r {
            SessionRecord::Gain(g) => Some(*g),
            _ => None,
        })
    }
}

impl SessionFactory for MockSessionFactory {
    type Session = MockSession;

    fn create(&mut self) -> MockSession {
        let mut shared = self.shared.borrow_mut();
        shared.created = shared.created.saturating_add(1);
        MockSession {
            shared: Rc::clone(&self.shared),
            behaviour: StreamBehaviour::Healthy,
            held: Vec::new(),
            running: false,
            steps: 0,
            events: VecDeque::new(),
        }
    }
}

/// Session produced by [`MockSessionFactory`].
#[derive(Debug)]
pub struct MockSession {
    shared: Rc<RefCell<SessionShared>>,
    behaviour: StreamBehaviour,
    held: Vec<Resource>,
    running: bool,
    steps: u32,
    events: VecDeque<SessionEvent>,
}

impl MockSession {
    fn acquire(&mut self, resource: Resource) {
        self.held.push(resource);
        self.record(SessionRecord::Acquired(resource));
    }

    fn record(&self, entry: SessionRecord) {
        self.shared.borrow_mut().log.push(entry);
    }
}

impl AudioSession for MockSession {
    type Error = MockStreamError;

    fn start(&mut self, uri: &str) -> Result<(), Self::Error> {
        self.record(SessionRecord::Start(uri.to_string()));
        self.behaviour = self
            .shared
            .borrow()
            .behaviours
            .get(uri)
            .copied()
            .unwrap_or_default();

        self.acquire(Resource::Source);
        if self.behaviour == StreamBehaviour::Refuse {
            self.record(SessionRecord::Refused(uri.to_string()));
            return Err(MockStreamError {
                uri: uri.to_string(),
            });
        }
        self.acquire(Resource::Buffer);
        self.acquire(Resource::Decoder);

        self.running = self.behaviour != StreamBehaviour::Stalled;
        self.steps = 0;
        if let Some(queued) = self.shared.borrow_mut().events.remove(uri) {
            self.events = queued;
        }
        Ok(())
    }

    fn poll_step(&mut self) -> StepOutcome {
        if !self.running {
            return StepOutcome::Ended;
        }
        if let StreamBehaviour::EndAfter(limit) = self.behaviour {
            if self.steps >= limit {
                self.running = false;
                return StepOutcome::Ended;
            }
        }
        self.steps = self.steps.saturating_add(1);
        StepOutcome::Progress
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        self.running = false;
        for resource in [Resource::Decoder, Resource::Buffer, Resource::Source] {
            if let Some(pos) = self.held.iter().position(|r| *r == resource) {
                self.held.remove(pos);
                self.record(SessionRecord::Released(resource));
            }
        }
    }

    fn set_gain(&mut self, gain: Gain) {
        self.record(SessionRecord::Gain(gain.get()));
    }

    fn take_event(&mut self) -> Option<SessionEvent> {
        let event = self.events.pop_front()?;
        self.record(SessionRecord::Drained(event.clone()));
        Some(event)
    }
}

// ── Network ─────────────────────────────────────────────────────────────────

/// Error returned by [`MockNetwork::begin`] when refusal was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLinkError;

impl core::fmt::Display for MockLinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("radio refused to start association")
    }
}

impl std::error::Error for MockLinkError {}

/// Station-mode link that associates after a fixed number of polls.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    polls_until_up: u32,
    polls: u32,
    refuse_begin: bool,
    began_with: Option<Credentials>,
    info: LinkInfo,
}

impl MockNetwork {
    /// Associate on the `polls_until_up`-th call to `is_associated`.
    pub fn associating_after(polls_until_up: u32) -> Self {
        let mut info = LinkInfo {
            ip: [192, 168, 1, 50],
            mac: [0x02, 0x00, 0x00, 0x00, 0x00, 0x01],
            rssi: -58,
            ..LinkInfo::default()
        };
        info.hostname.push_str("pushbutton-radio").ok();
        Self {
            polls_until_up,
            polls: 0,
            refuse_begin: false,
            began_with: None,
            info,
        }
    }

    /// Make `begin` fail.
    pub fn refusing(mut self) -> Self {
        self.refuse_begin = true;
        self
    }

    /// Number of `is_associated` calls so far.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Credentials passed to `begin`, if it was called.
    pub fn began_with(&self) -> Option<&Credentials> {
        self.began_with.as_ref()
    }
}

impl NetworkLink for MockNetwork {
    type Error = MockLinkError;

    fn begin(&mut self, credentials: &Credentials) -> Result<(), Self::Error> {
        if self.refuse_begin {
            return Err(MockLinkError);
        }
        self.info.ssid.clone_from(&credentials.ssid);
        self.began_with = Some(credentials.clone());
        Ok(())
    }

    fn is_associated(&mut self) -> bool {
        self.polls = self.polls.saturating_add(1);
        self.began_with.is_some() && self.polls >= self.polls_until_up
    }

    fn info(&self) -> LinkInfo {
        self.info.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_hal::digital::InputPin;

    #[test]
    fn test_mock_pin_shares_level_between_clones() {
        let driver = MockPin::new();
        let mut pin = driver.clone();
        assert!(pin.is_high().unwrap());
        driver.press();
        assert!(pin.is_low().unwrap());
        driver.fail_next_reads(1);
        assert!(pin.is_high().is_err());
        assert!(pin.is_low().unwrap());
    }

    #[test]
    fn test_mock_clock_advances() {
        let clock = MockClock::at(10);
        clock.advance(40);
        assert_eq!(clock.now(), Instant::from_millis(50));
    }

    #[test]
    fn test_mock_session_refuse_leaves_source_until_stop() {
        let mut factory = MockSessionFactory::new();
        factory.set_behaviour("http://down", StreamBehaviour::Refuse);
        let mut session = factory.create();
        assert!(session.start("http://down").is_err());
        assert_eq!(factory.live_resources(), 1);
        session.stop();
        assert_eq!(factory.live_resources(), 0);
    }

    #[test]
    fn test_mock_session_teardown_order() {
        let mut factory = MockSessionFactory::new();
        let mut session = factory.create();
        session.start("http://up").unwrap();
        factory.clear_log();
        session.stop();
        session.stop();
        assert_eq!(
            factory.log(),
            vec![
                SessionRecord::Released(Resource::Decoder),
                SessionRecord::Released(Resource::Buffer),
                SessionRecord::Released(Resource::Source),
            ]
        );
    }

    #[test]
    fn test_mock_session_end_after() {
        let mut factory = MockSessionFactory::new();
        factory.set_behaviour("http://short", StreamBehaviour::EndAfter(2));
        let mut session = factory.create();
        session.start("http://short").unwrap();
        assert_eq!(session.poll_step(), StepOutcome::Progress);
        assert_eq!(session.poll_step(), StepOutcome::Progress);
        assert_eq!(session.poll_step(), StepOutcome::Ended);
        assert!(!session.is_running());
    }

    #[test]
    fn test_mock_network_associates_after_polls() {
        let mut link = MockNetwork::associating_after(3);
        link.begin(&Credentials::default()).unwrap();
        assert!(!link.is_associated());
        assert!(!link.is_associated());
        assert!(link.is_associated());
        assert_eq!(link.polls(), 3);
    }
}
